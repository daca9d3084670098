//! The `chapterquiz validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use chapterquiz_core::parser::{parse_question_file, validate_question_set};
use chapterquiz_core::scoring::gradable_count;
use chapterquiz_sources::{create_source, load_config_from};

pub async fn execute(
    chapter: Option<String>,
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (label, questions) = match (chapter, file) {
        (_, Some(path)) => (path.display().to_string(), parse_question_file(&path)?),
        (Some(id), None) => {
            let config = load_config_from(config_path.as_deref())?;
            let source = create_source(&config.source);
            let questions = source
                .load_chapter(&id)
                .await
                .with_context(|| format!("failed to load chapter {id}"))?;
            (format!("Chapter {id}"), questions)
        }
        (None, None) => anyhow::bail!("pass --chapter or --file"),
    };

    println!(
        "{label}: {} questions, {} auto-graded",
        questions.len(),
        gradable_count(&questions)
    );

    let warnings = validate_question_set(&questions);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question set valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
