//! Content directory source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use chapterquiz_core::catalog::{parse_catalog_str, ChapterMeta};
use chapterquiz_core::error::LoadError;
use chapterquiz_core::model::Question;
use chapterquiz_core::parser::parse_question_set_str;
use chapterquiz_core::traits::{chapter_file_name, QuestionSource, CATALOG_FILE_NAME};

/// Reads `ch{id}.json` and `meta.json` from a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read(&self, file_name: &str) -> Result<String, LoadError> {
        let path = self.root.join(file_name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LoadError::NotFound(path.display().to_string())
            } else {
                LoadError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl QuestionSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn load_chapter(&self, chapter_id: &str) -> Result<Vec<Question>, LoadError> {
        if chapter_id.is_empty() || chapter_id.contains(['/', '\\']) {
            return Err(LoadError::NotFound(format!("chapter {chapter_id:?}")));
        }
        let file_name = chapter_file_name(chapter_id);
        let content = self.read(&file_name).await?;
        let questions = parse_question_set_str(&content, &file_name)?;
        tracing::debug!("loaded {} questions from {file_name}", questions.len());
        Ok(questions)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn load_catalog(&self) -> Result<Vec<ChapterMeta>, LoadError> {
        let content = self.read(CATALOG_FILE_NAME).await?;
        parse_catalog_str(&content, CATALOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterquiz_core::catalog::load_catalog_or_default;
    use chapterquiz_core::model::QuestionType;

    fn content_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ch1.json"),
            r#"[{"id": 1, "stem": "s", "options": ["a", "b"], "answerIndex": 0},
                {"id": 2, "stem": "t"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("ch2.json"), "[{ broken").unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_and_normalizes_chapter() {
        let dir = content_dir();
        let source = DirectorySource::new(dir.path());

        let questions = source.load_chapter("1").await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question_type(), QuestionType::Fill);
    }

    #[tokio::test]
    async fn missing_and_malformed_chapters() {
        let dir = content_dir();
        let source = DirectorySource::new(dir.path());

        let missing = source.load_chapter("7").await.unwrap_err();
        assert!(matches!(missing, LoadError::NotFound(_)));

        let broken = source.load_chapter("2").await.unwrap_err();
        assert!(matches!(broken, LoadError::Parse { .. }));

        let escaped = source.load_chapter("../ch1").await.unwrap_err();
        assert!(matches!(escaped, LoadError::NotFound(_)));
    }

    #[tokio::test]
    async fn catalog_falls_back_to_defaults() {
        let dir = content_dir();
        let source = DirectorySource::new(dir.path());
        assert_eq!(load_catalog_or_default(&source).await.len(), 3);

        std::fs::write(
            dir.path().join("meta.json"),
            r#"[{"id": "1", "title": "Sets", "total": 2}]"#,
        )
        .unwrap();
        let chapters = load_catalog_or_default(&source).await;
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Sets");
    }
}
