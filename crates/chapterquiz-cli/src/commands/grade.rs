//! The `chapterquiz grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use chapterquiz_core::answers::AnswerSheet;
use chapterquiz_core::catalog::load_catalog_or_default;
use chapterquiz_core::scoring::{NavStatus, QuestionOutcome};
use chapterquiz_core::session::QuizSession;
use chapterquiz_core::store::{record_attempt, FileResultStore};
use chapterquiz_report::{write_html_report, ChapterReview};
use chapterquiz_sources::{create_source, load_config_from};

/// Machine-readable grading output.
#[derive(Serialize)]
struct GradeOutput<'a> {
    chapter: &'a str,
    score: f64,
    total: usize,
    percent: u32,
    questions: &'a [QuestionOutcome],
    saved: bool,
}

pub async fn execute(
    chapter: String,
    answers_path: PathBuf,
    format: String,
    html: Option<PathBuf>,
    no_save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if format != "text" && format != "json" {
        anyhow::bail!("unknown format: {format} (expected text or json)");
    }

    let config = load_config_from(config_path.as_deref())?;
    let source = create_source(&config.source);

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let sheet: AnswerSheet = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    let mut session = QuizSession::new();
    session
        .load_from(source.as_ref(), &chapter)
        .await
        .with_context(|| format!("failed to load chapter {chapter}"))?;
    tracing::info!(
        "chapter {chapter}: {} questions, {} auto-graded",
        session.questions().len(),
        session.gradable_count()
    );

    session.apply_answers(sheet)?;
    let submission = session.submit()?;
    let summary = &submission.summary;

    let saved = if no_save {
        false
    } else {
        let store = FileResultStore::new(&config.results_dir);
        let saved = record_attempt(&store, &chapter, &submission.attempt);
        if saved {
            tracing::info!("result saved to {}", store.dir().display());
        }
        saved
    };

    match format.as_str() {
        "json" => {
            let output = GradeOutput {
                chapter: &chapter,
                score: summary.total_score,
                total: summary.gradable_count,
                percent: summary.percent,
                questions: &summary.outcomes,
                saved,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            for (question, outcome) in session.questions().iter().zip(&summary.outcomes) {
                println!(
                    "  [{}] {:<8} {}",
                    question.id,
                    question.question_type(),
                    status_label(outcome.status())
                );
            }
            println!(
                "\nScore: {} / {} ({}%)",
                summary.total_score, summary.gradable_count, summary.percent
            );
        }
    }

    if let Some(path) = html {
        let catalog = load_catalog_or_default(source.as_ref()).await;
        let title = catalog
            .iter()
            .find(|c| c.id == chapter)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| format!("Chapter {chapter}"));
        let review = ChapterReview {
            chapter_id: &chapter,
            title: &title,
            questions: session.questions(),
            attempt: &submission.attempt,
            summary,
        };
        write_html_report(&review, &path)?;
        eprintln!("HTML review: {}", path.display());
    }

    Ok(())
}

fn status_label(status: NavStatus) -> &'static str {
    match status {
        NavStatus::Correct => "correct",
        NavStatus::Partial => "partial",
        NavStatus::Wrong => "wrong",
        NavStatus::Ungraded => "not auto-graded",
    }
}
