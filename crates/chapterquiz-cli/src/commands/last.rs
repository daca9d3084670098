//! The `chapterquiz last` command.

use std::path::PathBuf;

use anyhow::Result;

use chapterquiz_core::store::{last_attempt, FileResultStore};
use chapterquiz_sources::load_config_from;

use super::{format_attempt, format_time};

pub fn execute(chapter: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = FileResultStore::new(&config.results_dir);

    match last_attempt(&store, &chapter) {
        Some(attempt) => {
            println!("Chapter {chapter}: {}", format_attempt(&attempt));
            println!("Submitted: {}", format_time(&attempt));
            println!("Answered: {} question(s)", attempt.answers.len());
        }
        None => println!("Chapter {chapter}: no record"),
    }

    Ok(())
}
