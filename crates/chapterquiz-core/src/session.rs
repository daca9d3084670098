//! Per-chapter quiz session.
//!
//! Owns the loaded questions and the answer sheet, and walks the
//! `Loading → Ready → Submitted → Ready` cycle. Scoring itself is delegated
//! to [`crate::scoring`], which never sees the session.

use chrono::Utc;

use crate::answers::AnswerSheet;
use crate::error::{LoadError, SessionError};
use crate::model::{Answer, Question, QuestionType};
use crate::results::AttemptResult;
use crate::scoring::{self, ScoreSummary};
use crate::traits::QuestionSource;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// The last load failed; the user may retry.
    Failed(LoadError),
    /// Answers may be changed.
    Ready,
    /// Results are shown and answers are locked.
    Submitted,
}

/// Handle for one in-flight chapter load.
///
/// Only the ticket from the most recent [`QuizSession::begin_load`] can
/// complete a load; older tickets are stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    chapter_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn chapter_id(&self) -> &str {
        &self.chapter_id
    }
}

/// One user interaction with a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Choose an option (single) or toggle it (multiple).
    Option(usize),
    /// Free text for a fill question.
    Text(String),
}

/// The result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub summary: ScoreSummary,
    pub attempt: AttemptResult,
}

/// State for answering one chapter.
#[derive(Debug)]
pub struct QuizSession {
    chapter_id: String,
    generation: u64,
    phase: Phase,
    questions: Vec<Question>,
    answers: AnswerSheet,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            chapter_id: String::new(),
            generation: 0,
            phase: Phase::Loading,
            questions: Vec::new(),
            answers: AnswerSheet::new(),
        }
    }

    /// A session already loaded with `questions`.
    pub fn with_questions(chapter_id: &str, questions: Vec<Question>) -> Self {
        let mut session = Self::new();
        let ticket = session.begin_load(chapter_id);
        session.finish_load(&ticket, Ok(questions));
        session
    }

    /// Start loading `chapter_id`, discarding questions, answers, and any
    /// load still in flight.
    pub fn begin_load(&mut self, chapter_id: &str) -> LoadTicket {
        self.generation += 1;
        self.chapter_id = chapter_id.to_string();
        self.phase = Phase::Loading;
        self.questions.clear();
        self.answers.clear();
        LoadTicket {
            chapter_id: self.chapter_id.clone(),
            generation: self.generation,
        }
    }

    /// Complete a load. Returns `false` and changes nothing if the ticket is
    /// stale.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Question>, LoadError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "ignoring stale load of chapter {} (generation {} < {})",
                ticket.chapter_id,
                ticket.generation,
                self.generation
            );
            return false;
        }
        match result {
            Ok(questions) => {
                tracing::debug!(
                    "chapter {} ready with {} questions",
                    self.chapter_id,
                    questions.len()
                );
                self.questions = questions;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                tracing::warn!("loading chapter {} failed: {e}", self.chapter_id);
                self.phase = Phase::Failed(e);
            }
        }
        true
    }

    /// Load `chapter_id` from `source` and wait for it.
    pub async fn load_from(
        &mut self,
        source: &dyn QuestionSource,
        chapter_id: &str,
    ) -> Result<(), LoadError> {
        let ticket = self.begin_load(chapter_id);
        let result = source.load_chapter(chapter_id).await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_load(&ticket, result);
        outcome
    }

    pub fn chapter_id(&self) -> &str {
        &self.chapter_id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn gradable_count(&self) -> usize {
        scoring::gradable_count(&self.questions)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Submitted => Err(SessionError::Locked),
            Phase::Loading | Phase::Failed(_) => Err(SessionError::NotReady),
        }
    }

    /// Type and option count of a question.
    fn shape_of(&self, question_id: &str) -> Result<(QuestionType, usize), SessionError> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| (q.question_type(), q.options.len()))
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))
    }

    /// Apply one interaction: choose (single), toggle (multiple), or write
    /// text (fill).
    pub fn select(&mut self, question_id: &str, selection: Selection) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let (question_type, option_count) = self.shape_of(question_id)?;
        let invalid = |reason: String| SessionError::InvalidSelection {
            question_id: question_id.to_string(),
            reason,
        };

        match (question_type, selection) {
            (QuestionType::Single, Selection::Option(i)) => {
                check_option(option_count, i).map_err(invalid)?;
                self.answers.record(question_id, Answer::Index(i));
            }
            (QuestionType::Multiple, Selection::Option(i)) => {
                check_option(option_count, i).map_err(invalid)?;
                self.answers.toggle(question_id, i);
            }
            (QuestionType::Fill, Selection::Text(text)) => {
                self.answers.record(question_id, Answer::Text(text));
            }
            (QuestionType::Fill, Selection::Option(_)) => {
                return Err(invalid("fill questions take text".into()));
            }
            (_, Selection::Text(_)) => {
                return Err(invalid("choice questions take an option index".into()));
            }
        }
        Ok(())
    }

    /// Record a complete answer for one question, replacing any previous one.
    pub fn set_answer(&mut self, question_id: &str, answer: Answer) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let (question_type, option_count) = self.shape_of(question_id)?;
        let invalid = |reason: String| SessionError::InvalidSelection {
            question_id: question_id.to_string(),
            reason,
        };

        match (question_type, &answer) {
            (QuestionType::Single, Answer::Index(i)) => {
                check_option(option_count, *i).map_err(invalid)?;
            }
            (QuestionType::Multiple, Answer::Indices(selected)) => {
                for &i in selected {
                    check_option(option_count, i).map_err(invalid)?;
                }
            }
            (QuestionType::Fill, Answer::Text(_)) => {}
            (question_type, _) => {
                return Err(invalid(format!(
                    "answer shape does not fit a {question_type} question"
                )));
            }
        }
        self.answers.record(question_id, answer);
        Ok(())
    }

    /// Record every answer in `sheet`, stopping at the first invalid one.
    pub fn apply_answers(&mut self, sheet: AnswerSheet) -> Result<(), SessionError> {
        for (question_id, answer) in sheet {
            self.set_answer(&question_id, answer)?;
        }
        Ok(())
    }

    /// Ids of gradable questions that still have no answer.
    pub fn unanswered(&self) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|q| q.is_gradable() && !self.answers.contains(&q.id))
            .map(|q| q.id.as_str())
            .collect()
    }

    /// Whether submission is currently allowed.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Ready && !self.questions.is_empty() && self.unanswered().is_empty()
    }

    /// Score the current answers and lock the session.
    pub fn submit(&mut self) -> Result<Submission, SessionError> {
        self.ensure_editable()?;
        if self.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let missing = self.unanswered();
        if !missing.is_empty() {
            return Err(SessionError::Incomplete {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        let summary = scoring::score_question_set(&self.questions, &self.answers);
        let attempt = AttemptResult::from_summary(&summary, self.answers.clone(), Utc::now());
        self.phase = Phase::Submitted;
        tracing::debug!(
            "chapter {} submitted: {}/{} ({}%)",
            self.chapter_id,
            summary.total_score,
            summary.gradable_count,
            summary.percent
        );
        Ok(Submission { summary, attempt })
    }

    /// Unlock answers after a submission. Selections are kept.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Submitted | Phase::Ready => {
                self.phase = Phase::Ready;
                Ok(())
            }
            Phase::Loading | Phase::Failed(_) => Err(SessionError::NotReady),
        }
    }

    /// The score shown while submitted.
    pub fn summary(&self) -> Option<ScoreSummary> {
        (self.phase == Phase::Submitted)
            .then(|| scoring::score_question_set(&self.questions, &self.answers))
    }
}

fn check_option(option_count: usize, index: usize) -> Result<(), String> {
    if index < option_count {
        Ok(())
    } else {
        Err(format!(
            "option {index} is out of range for {option_count} options"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChapterMeta;
    use crate::model::{ChoiceOption, QuestionKind};
    use crate::scoring::Credit;
    use async_trait::async_trait;
    use std::collections::BTreeSet;

    fn options(n: usize) -> Vec<ChoiceOption> {
        (0..n).map(|i| ChoiceOption::text(format!("{i}"))).collect()
    }

    fn chapter() -> Vec<Question> {
        vec![
            Question {
                id: "q1".into(),
                stem: "single".into(),
                image: None,
                options: options(3),
                kind: QuestionKind::Single { answer_index: 1 },
                explain: None,
            },
            Question {
                id: "q2".into(),
                stem: "multiple".into(),
                image: None,
                options: options(4),
                kind: QuestionKind::Multiple {
                    answer_indices: BTreeSet::from([0, 2]),
                },
                explain: Some("0 and 2".into()),
            },
            Question {
                id: "q3".into(),
                stem: "fill".into(),
                image: None,
                options: vec![],
                kind: QuestionKind::Fill,
                explain: None,
            },
        ]
    }

    #[test]
    fn submission_requires_every_gradable_answer() {
        let mut session = QuizSession::with_questions("1", chapter());
        assert_eq!(session.phase(), &Phase::Ready);
        assert!(!session.can_submit());

        session.select("q1", Selection::Option(1)).unwrap();
        let err = session.submit().unwrap_err();
        assert_eq!(
            err,
            SessionError::Incomplete {
                missing: vec!["q2".into()]
            }
        );

        session.select("q2", Selection::Option(0)).unwrap();
        assert!(session.can_submit());
        let submission = session.submit().unwrap();
        assert_eq!(submission.summary.gradable_count, 2);
        assert!((submission.summary.total_score - 1.5).abs() < f64::EPSILON);
        assert_eq!(submission.summary.percent, 75);
        assert_eq!(submission.attempt.total, 2);
        assert_eq!(session.phase(), &Phase::Submitted);
    }

    #[test]
    fn submitted_session_is_locked_until_edit() {
        let mut session = QuizSession::with_questions("1", chapter());
        session.select("q1", Selection::Option(0)).unwrap();
        session.select("q2", Selection::Option(0)).unwrap();
        session.submit().unwrap();

        assert_eq!(
            session.select("q1", Selection::Option(1)),
            Err(SessionError::Locked)
        );
        assert!(session.submit().is_err());

        session.edit().unwrap();
        assert_eq!(session.answered_count(), 2);
        session.select("q1", Selection::Option(1)).unwrap();
        session.select("q2", Selection::Option(2)).unwrap();

        let resubmitted = session.submit().unwrap();
        assert_eq!(resubmitted.summary.outcomes[0].credit, Some(Credit::Full));
        assert_eq!(resubmitted.summary.outcomes[1].credit, Some(Credit::Full));
        assert_eq!(resubmitted.summary.percent, 100);
        assert_eq!(session.summary(), Some(resubmitted.summary));
    }

    #[test]
    fn toggled_off_selection_still_counts_as_answered() {
        let mut session = QuizSession::with_questions("1", chapter());
        session.select("q1", Selection::Option(1)).unwrap();
        session.select("q2", Selection::Option(3)).unwrap();
        session.select("q2", Selection::Option(3)).unwrap();
        assert!(session.can_submit());
        let submission = session.submit().unwrap();
        assert_eq!(submission.summary.outcomes[1].credit, Some(Credit::None));
    }

    #[test]
    fn selection_must_fit_question() {
        let mut session = QuizSession::with_questions("1", chapter());
        assert!(matches!(
            session.select("q1", Selection::Option(7)),
            Err(SessionError::InvalidSelection { .. })
        ));
        assert!(matches!(
            session.select("q3", Selection::Option(0)),
            Err(SessionError::InvalidSelection { .. })
        ));
        assert!(matches!(
            session.select("q1", Selection::Text("b".into())),
            Err(SessionError::InvalidSelection { .. })
        ));
        assert_eq!(
            session.select("nope", Selection::Option(0)),
            Err(SessionError::UnknownQuestion("nope".into()))
        );
        session.select("q3", Selection::Text("my work".into())).unwrap();
    }

    #[test]
    fn set_answer_validates_shape() {
        let mut session = QuizSession::with_questions("1", chapter());
        assert!(session.set_answer("q1", Answer::Indices(BTreeSet::from([1]))).is_err());
        assert!(session.set_answer("q2", Answer::Indices(BTreeSet::from([0, 9]))).is_err());
        session.set_answer("q2", Answer::Indices(BTreeSet::from([2, 0]))).unwrap();

        let sheet: AnswerSheet = serde_json::from_str(r#"{"q1": 1, "q3": "text"}"#).unwrap();
        session.apply_answers(sheet).unwrap();
        assert_eq!(session.submit().unwrap().summary.percent, 100);
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut session = QuizSession::new();
        let first = session.begin_load("1");
        let second = session.begin_load("2");

        assert!(!session.finish_load(&first, Ok(chapter())));
        assert_eq!(session.phase(), &Phase::Loading);

        assert!(session.finish_load(&second, Ok(chapter()[..1].to_vec())));
        assert_eq!(session.chapter_id(), "2");
        assert_eq!(session.questions().len(), 1);
    }

    #[test]
    fn reload_clears_answers_and_failure_blocks_answering() {
        let mut session = QuizSession::with_questions("1", chapter());
        session.select("q1", Selection::Option(1)).unwrap();

        let ticket = session.begin_load("1");
        assert!(session.answers().is_empty());
        session.finish_load(&ticket, Err(LoadError::Network("HTTP 503".into())));

        assert!(matches!(session.phase(), Phase::Failed(e) if e.is_retryable()));
        assert_eq!(
            session.select("q1", Selection::Option(1)),
            Err(SessionError::NotReady)
        );
    }

    #[test]
    fn empty_chapter_cannot_be_submitted() {
        let mut session = QuizSession::with_questions("9", vec![]);
        assert!(!session.can_submit());
        assert_eq!(session.submit().unwrap_err(), SessionError::NoQuestions);
    }

    struct FixedSource(Vec<Question>);

    #[async_trait]
    impl QuestionSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn load_chapter(&self, chapter_id: &str) -> Result<Vec<Question>, LoadError> {
            if chapter_id == "1" {
                Ok(self.0.clone())
            } else {
                Err(LoadError::NotFound(format!("ch{chapter_id}.json")))
            }
        }

        async fn load_catalog(&self) -> Result<Vec<ChapterMeta>, LoadError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn load_from_source() {
        let source = FixedSource(chapter());
        let mut session = QuizSession::new();

        session.load_from(&source, "1").await.unwrap();
        assert_eq!(session.questions().len(), 3);

        let err = session.load_from(&source, "2").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(matches!(session.phase(), Phase::Failed(_)));
        assert!(session.questions().is_empty());
    }
}
