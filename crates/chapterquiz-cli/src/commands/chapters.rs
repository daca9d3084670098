//! The `chapterquiz chapters` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use chapterquiz_core::catalog::{filter_chapters, load_catalog_or_default};
use chapterquiz_core::store::{last_attempt, FileResultStore};
use chapterquiz_sources::{create_source, load_config_from};

use super::format_time;

pub async fn execute(search: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let source = create_source(&config.source);
    let store = FileResultStore::new(&config.results_dir);

    let catalog = load_catalog_or_default(source.as_ref()).await;
    let chapters = filter_chapters(&catalog, search.as_deref().unwrap_or(""));

    if chapters.is_empty() {
        println!("No chapters match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Description", "Last result", "When"]);

    for chapter in chapters {
        let last = last_attempt(&store, &chapter.id);
        let standing = chapter.standing(last.as_ref());
        let result = match (standing.last_score, standing.total, standing.percent) {
            (Some(score), Some(total), Some(pct)) => format!("{score}/{total} ({pct}%)"),
            (Some(score), _, _) => format!("{score}"),
            _ => "no record".to_string(),
        };
        let when = last.as_ref().map(format_time).unwrap_or_default();

        table.add_row(vec![
            Cell::new(&chapter.id),
            Cell::new(&chapter.title),
            Cell::new(chapter.desc.as_deref().unwrap_or("")),
            Cell::new(result),
            Cell::new(when),
        ]);
    }

    println!("{table}");
    Ok(())
}
