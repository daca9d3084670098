//! Trait definition for question content sources.
//!
//! Implemented by the `chapterquiz-sources` crate for content directories
//! and static HTTP hosts.

use async_trait::async_trait;

use crate::catalog::ChapterMeta;
use crate::error::LoadError;
use crate::model::Question;

/// A place chapter question sets and the chapter catalog can be loaded from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "directory").
    fn name(&self) -> &str;

    /// Load and normalize the questions of one chapter.
    async fn load_chapter(&self, chapter_id: &str) -> Result<Vec<Question>, LoadError>;

    /// Load the chapter catalog (`meta.json`).
    async fn load_catalog(&self) -> Result<Vec<ChapterMeta>, LoadError>;
}

/// File name of a chapter's question set.
pub fn chapter_file_name(chapter_id: &str) -> String {
    format!("ch{chapter_id}.json")
}

/// File name of the chapter catalog.
pub const CATALOG_FILE_NAME: &str = "meta.json";
