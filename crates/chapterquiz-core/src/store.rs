//! Last-attempt persistence.
//!
//! One record per chapter under the key `chapter-{id}-last`; each save
//! overwrites the previous one. Callers treat the store as a best-effort
//! cache via [`record_attempt`] and [`last_attempt`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::results::AttemptResult;

/// Storage for the most recent attempt of each chapter.
pub trait ResultStore: Send + Sync {
    fn save(&self, chapter_id: &str, attempt: &AttemptResult) -> Result<()>;

    fn load(&self, chapter_id: &str) -> Result<Option<AttemptResult>>;
}

/// Namespaced key for a chapter's last attempt.
pub fn storage_key(chapter_id: &str) -> String {
    format!("chapter-{chapter_id}-last")
}

/// Save an attempt, logging and swallowing any failure.
pub fn record_attempt(store: &dyn ResultStore, chapter_id: &str, attempt: &AttemptResult) -> bool {
    match store.save(chapter_id, attempt) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("could not save result for chapter {chapter_id}: {e:#}");
            false
        }
    }
}

/// Load the last attempt, treating any failure as "no record".
pub fn last_attempt(store: &dyn ResultStore, chapter_id: &str) -> Option<AttemptResult> {
    match store.load(chapter_id) {
        Ok(attempt) => attempt,
        Err(e) => {
            tracing::warn!("could not read result for chapter {chapter_id}: {e:#}");
            None
        }
    }
}

/// Stores each record as `{dir}/chapter-{id}-last.json`.
#[derive(Debug, Clone)]
pub struct FileResultStore {
    dir: PathBuf,
}

impl FileResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, chapter_id: &str) -> Result<PathBuf> {
        anyhow::ensure!(
            !chapter_id.is_empty()
                && !chapter_id.contains(['/', '\\'])
                && chapter_id != "."
                && chapter_id != "..",
            "invalid chapter id for storage: {chapter_id:?}"
        );
        Ok(self.dir.join(format!("{}.json", storage_key(chapter_id))))
    }
}

impl ResultStore for FileResultStore {
    fn save(&self, chapter_id: &str, attempt: &AttemptResult) -> Result<()> {
        let path = self.path_for(chapter_id)?;
        let json = serde_json::to_string_pretty(attempt).context("failed to serialize attempt")?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("saved attempt to {}", path.display());
        Ok(())
    }

    fn load(&self, chapter_id: &str) -> Result<Option<AttemptResult>> {
        let path = self.path_for(chapter_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let attempt = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(attempt))
    }
}

/// In-process store keyed like the file store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    records: Mutex<HashMap<String, AttemptResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryResultStore {
    fn save(&self, chapter_id: &str, attempt: &AttemptResult) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("result store lock poisoned"))?;
        records.insert(storage_key(chapter_id), attempt.clone());
        Ok(())
    }

    fn load(&self, chapter_id: &str) -> Result<Option<AttemptResult>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("result store lock poisoned"))?;
        Ok(records.get(&storage_key(chapter_id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerSheet;
    use chrono::Utc;

    fn attempt(score: f64) -> AttemptResult {
        AttemptResult {
            score,
            total: 3,
            time: Utc::now(),
            answers: AnswerSheet::new(),
        }
    }

    #[test]
    fn file_store_overwrites_last_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResultStore::new(dir.path().join("results"));

        assert!(store.load("1").unwrap().is_none());

        store.save("1", &attempt(1.0)).unwrap();
        store.save("1", &attempt(2.5)).unwrap();
        let loaded = store.load("1").unwrap().unwrap();
        assert_eq!(loaded.score, 2.5);
        assert!(dir.path().join("results/chapter-1-last.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileResultStore::new(dir.path());
        assert!(store.save("../x", &attempt(1.0)).is_err());
        assert!(!record_attempt(&store, "a/b", &attempt(1.0)));
    }

    #[test]
    fn corrupt_record_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chapter-2-last.json"), "not json").unwrap();
        let store = FileResultStore::new(dir.path());

        assert!(store.load("2").is_err());
        assert!(last_attempt(&store, "2").is_none());
    }

    #[test]
    fn memory_store_is_keyed_per_chapter() {
        let store = MemoryResultStore::new();
        assert!(record_attempt(&store, "1", &attempt(1.0)));
        assert!(record_attempt(&store, "2", &attempt(0.5)));
        assert_eq!(last_attempt(&store, "1").unwrap().score, 1.0);
        assert_eq!(last_attempt(&store, "2").unwrap().score, 0.5);
        assert!(last_attempt(&store, "3").is_none());
    }
}
