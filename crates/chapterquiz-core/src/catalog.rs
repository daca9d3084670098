//! Chapter catalog: `meta.json` parsing, defaults, and keyword search.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoadError;
use crate::parser::RawId;
use crate::results::AttemptResult;
use crate::traits::QuestionSource;

/// One chapter entry as listed in `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMeta {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Number of auto-graded questions advertised by the catalog, if any.
    /// Same unit as [`AttemptResult::total`]; fill questions are not counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(RawId::into_string)
}

impl ChapterMeta {
    /// Whether `keyword` (already trimmed and lowercased) occurs in the
    /// title or description.
    fn matches(&self, keyword: &str) -> bool {
        let haystack = format!("{} {}", self.title, self.desc.as_deref().unwrap_or(""));
        haystack.to_lowercase().contains(keyword)
    }

    /// Summarize this chapter's last attempt for a listing.
    ///
    /// The denominator is the catalog's `total` when present, else the
    /// attempt's own total.
    pub fn standing(&self, last: Option<&AttemptResult>) -> ChapterStanding {
        let total = self.total.or_else(|| last.map(|a| a.total));
        let percent = match (total, last) {
            (Some(t), Some(a)) if t > 0 => Some((a.score / t as f64 * 100.0).round() as u32),
            _ => None,
        };
        ChapterStanding {
            total,
            last_score: last.map(|a| a.score),
            percent,
        }
    }
}

/// Display-ready summary of a chapter's last attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChapterStanding {
    pub total: Option<usize>,
    pub last_score: Option<f64>,
    pub percent: Option<u32>,
}

/// Parse `meta.json` content.
pub fn parse_catalog_str(content: &str, source_name: &str) -> Result<Vec<ChapterMeta>, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Catalog used when no `meta.json` is available.
pub fn default_catalog() -> Vec<ChapterMeta> {
    (1..=3)
        .map(|n| ChapterMeta {
            id: n.to_string(),
            title: format!("Chapter {n}"),
            desc: Some("Fixed question bank (local JSON)".into()),
            total: None,
        })
        .collect()
}

/// Load the catalog from `source`, falling back to `default_catalog` on any
/// failure.
pub async fn load_catalog_or_default(source: &dyn QuestionSource) -> Vec<ChapterMeta> {
    match source.load_catalog().await {
        Ok(chapters) => chapters,
        Err(e) => {
            tracing::debug!("catalog unavailable from {} ({e}), using defaults", source.name());
            default_catalog()
        }
    }
}

/// Filter chapters by a case-insensitive keyword. A blank keyword keeps all.
pub fn filter_chapters<'a>(chapters: &'a [ChapterMeta], keyword: &str) -> Vec<&'a ChapterMeta> {
    let keyword = keyword.trim().to_lowercase();
    chapters
        .iter()
        .filter(|ch| keyword.is_empty() || ch.matches(&keyword))
        .collect()
}
