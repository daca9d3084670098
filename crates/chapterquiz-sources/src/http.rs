//! Static HTTP host source.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use chapterquiz_core::catalog::{parse_catalog_str, ChapterMeta};
use chapterquiz_core::error::LoadError;
use chapterquiz_core::model::Question;
use chapterquiz_core::parser::parse_question_set_str;
use chapterquiz_core::traits::{chapter_file_name, QuestionSource, CATALOG_FILE_NAME};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches `{base_url}/questions/ch{id}.json` and `{base_url}/questions/meta.json`.
///
/// Every request carries a `_={millis}` query parameter so intermediate
/// caches never serve a stale question set.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, file_name: &str) -> Result<String, LoadError> {
        let url = format!("{}/questions/{file_name}", self.base_url);
        let busted = format!("{url}?_={}", chrono::Utc::now().timestamp_millis());

        let response = self.client.get(&busted).send().await.map_err(|e| {
            if e.is_timeout() {
                LoadError::Network(format!(
                    "request to {url} timed out after {DEFAULT_TIMEOUT_SECS}s"
                ))
            } else if e.is_connect() {
                LoadError::Network(format!("{} not reachable: {e}", self.base_url))
            } else {
                LoadError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(LoadError::NotFound(url));
        }
        if status >= 400 {
            return Err(LoadError::Network(format!("HTTP {status} from {url}")));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::Network(format!("failed to read body of {url}: {e}")))
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn load_chapter(&self, chapter_id: &str) -> Result<Vec<Question>, LoadError> {
        let file_name = chapter_file_name(chapter_id);
        let body = self.fetch(&file_name).await?;
        let questions = parse_question_set_str(&body, &file_name)?;
        tracing::debug!("fetched {} questions for chapter {chapter_id}", questions.len());
        Ok(questions)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn load_catalog(&self) -> Result<Vec<ChapterMeta>, LoadError> {
        let body = self.fetch(CATALOG_FILE_NAME).await?;
        parse_catalog_str(&body, CATALOG_FILE_NAME)
    }
}
