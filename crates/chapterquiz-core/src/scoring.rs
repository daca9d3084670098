//! Answer scoring and chapter aggregation.
//!
//! Single choice is all-or-nothing. Multiple choice awards half credit for
//! picking a non-empty subset of the correct options with no wrong picks,
//! and nothing at all once any wrong option is picked. Fill questions are
//! never scored and sit outside both numerator and denominator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::answers::AnswerSheet;
use crate::model::{Answer, Question, QuestionKind};

/// Credit earned on one gradable question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credit {
    None,
    Partial,
    Full,
}

impl Credit {
    pub fn value(self) -> f64 {
        match self {
            Credit::None => 0.0,
            Credit::Partial => 0.5,
            Credit::Full => 1.0,
        }
    }
}

/// Score one question. Returns `None` for fill questions.
///
/// A missing answer, or one of the wrong shape for the question type,
/// earns no credit.
pub fn grade(question: &Question, answer: Option<&Answer>) -> Option<Credit> {
    match &question.kind {
        QuestionKind::Fill => None,
        QuestionKind::Single { answer_index } => Some(match answer {
            Some(Answer::Index(chosen)) if chosen == answer_index => Credit::Full,
            _ => Credit::None,
        }),
        QuestionKind::Multiple { answer_indices } => {
            let credit = match answer {
                Some(Answer::Indices(selected)) => grade_multiple(answer_indices, selected),
                _ => Credit::None,
            };
            Some(credit)
        }
    }
}

fn grade_multiple(correct: &BTreeSet<usize>, selected: &BTreeSet<usize>) -> Credit {
    if selected.is_empty() || !selected.is_subset(correct) {
        Credit::None
    } else if selected.is_superset(correct) {
        Credit::Full
    } else {
        Credit::Partial
    }
}

/// Rounded percentage; 0 when nothing is gradable.
pub fn percent(total_score: f64, gradable_count: usize) -> u32 {
    if gradable_count == 0 {
        return 0;
    }
    (total_score / gradable_count as f64 * 100.0).round() as u32
}

/// Scoring outcome of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    /// `None` for fill questions.
    pub credit: Option<Credit>,
}

impl QuestionOutcome {
    pub fn status(&self) -> NavStatus {
        match self.credit {
            None => NavStatus::Ungraded,
            Some(Credit::Full) => NavStatus::Correct,
            Some(Credit::Partial) => NavStatus::Partial,
            Some(Credit::None) => NavStatus::Wrong,
        }
    }
}

/// Navigation badge for a question after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavStatus {
    Correct,
    Partial,
    Wrong,
    Ungraded,
}

/// Aggregate score for a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// One entry per question, in chapter order.
    pub outcomes: Vec<QuestionOutcome>,
    /// Number of non-fill questions.
    pub gradable_count: usize,
    /// Sum of credit over gradable questions.
    pub total_score: f64,
    /// `round(total_score / gradable_count * 100)`, 0 if nothing is gradable.
    pub percent: u32,
}

/// Number of questions that take part in scoring.
pub fn gradable_count(questions: &[Question]) -> usize {
    questions.iter().filter(|q| q.is_gradable()).count()
}

/// Score every question against the current answers.
pub fn score_question_set(questions: &[Question], answers: &AnswerSheet) -> ScoreSummary {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .map(|q| QuestionOutcome {
            question_id: q.id.clone(),
            credit: grade(q, answers.get(&q.id)),
        })
        .collect();

    let gradable_count = gradable_count(questions);
    let total_score = outcomes
        .iter()
        .filter_map(|o| o.credit)
        .map(Credit::value)
        .sum::<f64>();

    ScoreSummary {
        outcomes,
        gradable_count,
        total_score,
        percent: percent(total_score, gradable_count),
    }
}

/// How a choice is highlighted once results are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMark {
    /// Correct option (chosen, or the answer to a single-choice question).
    Correct,
    /// Chosen but wrong.
    Incorrect,
    /// Correct in a multiple-choice question but not chosen.
    Missed,
    Neutral,
}

/// Per-option highlighting. Empty for fill questions.
pub fn mark_choices(question: &Question, answer: Option<&Answer>) -> Vec<ChoiceMark> {
    let no_selection = BTreeSet::new();
    (0..question.options.len())
        .map(|i| {
            let is_correct = question.kind.is_correct_option(i);
            match &question.kind {
                QuestionKind::Fill => ChoiceMark::Neutral,
                QuestionKind::Single { .. } => {
                    let chosen = matches!(answer, Some(Answer::Index(c)) if *c == i);
                    match (is_correct, chosen) {
                        (true, _) => ChoiceMark::Correct,
                        (false, true) => ChoiceMark::Incorrect,
                        (false, false) => ChoiceMark::Neutral,
                    }
                }
                QuestionKind::Multiple { .. } => {
                    let selected = match answer {
                        Some(Answer::Indices(s)) => s,
                        _ => &no_selection,
                    };
                    match (is_correct, selected.contains(&i)) {
                        (true, true) => ChoiceMark::Correct,
                        (false, true) => ChoiceMark::Incorrect,
                        (true, false) => ChoiceMark::Missed,
                        (false, false) => ChoiceMark::Neutral,
                    }
                }
            }
        })
        .collect()
}
