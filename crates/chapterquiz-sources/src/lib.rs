//! chapterquiz-sources: Question content sources.
//!
//! Implements the `QuestionSource` trait for a local content directory and
//! for a static HTTP host, and loads the `chapterquiz.toml` configuration
//! that chooses between them.

pub mod config;
pub mod directory;
pub mod http;

pub use config::{create_source, load_config, load_config_from, ChapterquizConfig, SourceConfig};
pub use directory::DirectorySource;
pub use http::HttpSource;
