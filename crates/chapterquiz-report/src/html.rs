//! HTML review page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined, showing each
//! question with its choices highlighted the way the quiz shows results.

use std::path::Path;

use anyhow::{Context, Result};

use chapterquiz_core::model::{Answer, Question};
use chapterquiz_core::results::AttemptResult;
use chapterquiz_core::scoring::{mark_choices, ChoiceMark, NavStatus, ScoreSummary};

/// Everything needed to render one graded chapter.
#[derive(Debug, Clone, Copy)]
pub struct ChapterReview<'a> {
    pub chapter_id: &'a str,
    pub title: &'a str,
    pub questions: &'a [Question],
    pub attempt: &'a AttemptResult,
    pub summary: &'a ScoreSummary,
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn status_class(status: NavStatus) -> &'static str {
    match status {
        NavStatus::Correct => "ok",
        NavStatus::Partial => "partial",
        NavStatus::Wrong => "err",
        NavStatus::Ungraded => "ungraded",
    }
}

fn mark_class(mark: ChoiceMark) -> &'static str {
    match mark {
        ChoiceMark::Correct => "choice correct",
        ChoiceMark::Incorrect => "choice incorrect",
        ChoiceMark::Missed => "choice missed",
        ChoiceMark::Neutral => "choice",
    }
}

fn is_selected(answer: Option<&Answer>, index: usize) -> bool {
    match answer {
        Some(Answer::Index(i)) => *i == index,
        Some(Answer::Indices(set)) => set.contains(&index),
        _ => false,
    }
}

/// Generate an HTML review page for a graded chapter.
pub fn generate_html(review: &ChapterReview<'_>) -> String {
    let summary = review.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>chapterquiz: {}</title>\n",
        html_escape(review.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(review.title)));
    html.push_str(&format!(
        "<p class=\"meta\">Chapter {} | {} questions, {} auto-graded | submitted {}</p>\n",
        html_escape(review.chapter_id),
        review.questions.len(),
        summary.gradable_count,
        review.attempt.time.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"score\">Score: {} / {} ({}%)</p>\n",
        summary.total_score, summary.gradable_count, summary.percent
    ));
    html.push_str("</header>\n");

    // Navigation strip
    html.push_str("<nav class=\"navbar\">\n");
    for (i, outcome) in summary.outcomes.iter().enumerate() {
        html.push_str(&format!(
            "<a class=\"navbtn {}\" href=\"#q-{}\">{}</a>\n",
            status_class(outcome.status()),
            i + 1,
            i + 1
        ));
    }
    html.push_str("</nav>\n");

    // Questions
    for (i, question) in review.questions.iter().enumerate() {
        let answer = review.attempt.answers.get(&question.id);
        html.push_str(&format!(
            "<section class=\"card\" id=\"q-{}\">\n<div class=\"section-title\">Question {} ({})</div>\n",
            i + 1,
            i + 1,
            question.question_type()
        ));
        html.push_str(&format!(
            "<div class=\"stem\">{}</div>\n",
            html_escape(&question.stem)
        ));
        if let Some(image) = &question.image {
            html.push_str(&format!("<img src=\"{}\" alt=\"\">\n", html_escape(image)));
        }

        if question.is_gradable() {
            html.push_str("<ul class=\"choices\">\n");
            let marks = mark_choices(question, answer);
            for (j, (option, mark)) in question.options.iter().zip(marks).enumerate() {
                let tick = if is_selected(answer, j) { "&#x2611;" } else { "&#x2610;" };
                html.push_str(&format!(
                    "<li class=\"{}\">{} {}",
                    mark_class(mark),
                    tick,
                    html_escape(&option.text)
                ));
                if let Some(image) = &option.image {
                    html.push_str(&format!(" <img src=\"{}\" alt=\"\">", html_escape(image)));
                }
                html.push_str("</li>\n");
            }
            html.push_str("</ul>\n");
        } else {
            let text = match answer {
                Some(Answer::Text(t)) => t.as_str(),
                _ => "",
            };
            html.push_str(&format!("<pre class=\"fill\">{}</pre>\n", html_escape(text)));
            html.push_str("<p class=\"note\">Fill-in question, not auto-graded.</p>\n");
        }

        if let Some(explain) = &question.explain {
            html.push_str(&format!(
                "<p class=\"note explain\">Explanation: {}</p>\n",
                html_escape(explain)
            ));
        }
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Attempt record</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(review.attempt).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML review page to a file.
pub fn write_html_report(review: &ChapterReview<'_>, path: &Path) -> Result<()> {
    let html = generate_html(review);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML review to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --ok: #dcfce7; --err: #fde2e2; --partial: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --ok: #064e3b; --err: #7f1d1d; --partial: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta, .note { color: #6b7280; }
.score { font-size: 1.25rem; font-weight: bold; }
.navbar { display: flex; flex-wrap: wrap; gap: 0.4rem; margin: 1rem 0; }
.navbtn { display: inline-block; min-width: 2rem; text-align: center; padding: 0.25rem; border: 1px solid var(--border); border-radius: 6px; color: inherit; text-decoration: none; }
.ok, .correct { background: var(--ok); }
.err, .incorrect { background: var(--err); }
.partial, .missed { background: var(--partial); }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin-bottom: 0.75rem; }
.section-title { font-weight: bold; margin-bottom: 0.5rem; }
.choices { list-style: none; padding: 0; }
.choice { padding: 0.4rem 0.6rem; border-radius: 6px; margin: 0.2rem 0; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; white-space: pre-wrap; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
img { max-width: 100%; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chapterquiz_core::answers::AnswerSheet;
    use chapterquiz_core::model::{ChoiceOption, QuestionKind};
    use chapterquiz_core::scoring::score_question_set;
    use std::collections::BTreeSet;

    fn make_questions() -> Vec<Question> {
        vec![
            Question {
                id: "q1".into(),
                stem: "Is 1 < 2?".into(),
                image: None,
                options: vec![ChoiceOption::text("yes"), ChoiceOption::text("no")],
                kind: QuestionKind::Single { answer_index: 0 },
                explain: Some("Ordering of integers.".into()),
            },
            Question {
                id: "q2".into(),
                stem: "Pick evens".into(),
                image: None,
                options: vec![
                    ChoiceOption::text("2"),
                    ChoiceOption::text("3"),
                    ChoiceOption::text("4"),
                ],
                kind: QuestionKind::Multiple {
                    answer_indices: BTreeSet::from([0, 2]),
                },
                explain: None,
            },
            Question {
                id: "q3".into(),
                stem: "Prove it".into(),
                image: None,
                options: vec![],
                kind: QuestionKind::Fill,
                explain: None,
            },
        ]
    }

    fn make_attempt(questions: &[Question]) -> (AttemptResult, ScoreSummary) {
        let mut answers = AnswerSheet::new();
        answers.record("q1", Answer::Index(0));
        answers.record("q2", Answer::Indices(BTreeSet::from([0])));
        answers.record("q3", Answer::Text("<b>by induction</b>".into()));
        let summary = score_question_set(questions, &answers);
        let attempt = AttemptResult::from_summary(&summary, answers, chrono::Utc::now());
        (attempt, summary)
    }

    #[test]
    fn html_review_contains_required_elements() {
        let questions = make_questions();
        let (attempt, summary) = make_attempt(&questions);
        let review = ChapterReview {
            chapter_id: "1",
            title: "Chapter 1",
            questions: &questions,
            attempt: &attempt,
            summary: &summary,
        };
        let html = generate_html(&review);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Score: 1.5 / 2 (75%)"));
        assert!(html.contains("navbtn ok"));
        assert!(html.contains("navbtn partial"));
        assert!(html.contains("choice missed"));
        assert!(html.contains("Ordering of integers."));
        assert!(html.contains("&lt;b&gt;by induction&lt;/b&gt;"));
        assert!(!html.contains("<b>by induction"));
    }

    #[test]
    fn html_review_write_to_file() {
        let questions = make_questions();
        let (attempt, summary) = make_attempt(&questions);
        let review = ChapterReview {
            chapter_id: "1",
            title: "Chapter 1",
            questions: &questions,
            attempt: &attempt,
            summary: &summary,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/review.html");

        write_html_report(&review, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Pick evens"));
    }
}
