//! Configuration and source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chapterquiz_core::traits::QuestionSource;

use crate::directory::DirectorySource;
use crate::http::HttpSource;

/// Where question content is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Directory {
        #[serde(default = "default_content_dir")]
        path: PathBuf,
    },
    Http {
        base_url: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Directory {
            path: default_content_dir(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("./questions")
}

/// Top-level chapterquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterquizConfig {
    /// Question content source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Directory holding last-attempt records.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./chapterquiz-results")
}

impl Default for ChapterquizConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            results_dir: default_results_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is, never re-scanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `chapterquiz.toml` in the current directory
/// 2. `~/.config/chapterquiz/config.toml`
///
/// Environment variable overrides: `CHAPTERQUIZ_CONTENT_URL`,
/// `CHAPTERQUIZ_RESULTS_DIR`.
pub fn load_config() -> Result<ChapterquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ChapterquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("chapterquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ChapterquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ChapterquizConfig::default(),
    };

    if let Ok(url) = std::env::var("CHAPTERQUIZ_CONTENT_URL") {
        config.source = SourceConfig::Http { base_url: url };
    }
    if let Ok(dir) = std::env::var("CHAPTERQUIZ_RESULTS_DIR") {
        config.results_dir = PathBuf::from(dir);
    }

    config.source = match config.source {
        SourceConfig::Directory { path } => SourceConfig::Directory {
            path: resolve_path(&path),
        },
        SourceConfig::Http { base_url } => SourceConfig::Http {
            base_url: resolve_env_vars(&base_url),
        },
    };
    config.results_dir = resolve_path(&config.results_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("chapterquiz"))
}

/// Create a question source from its configuration.
pub fn create_source(config: &SourceConfig) -> Box<dyn QuestionSource> {
    match config {
        SourceConfig::Directory { path } => Box::new(DirectorySource::new(path.clone())),
        SourceConfig::Http { base_url } => Box::new(HttpSource::new(base_url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CHAPTERQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CHAPTERQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CHAPTERQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_CHAPTERQUIZ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_CHAPTERQUIZ_SELF_REF", "${_CHAPTERQUIZ_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_CHAPTERQUIZ_SELF_REF}/b"),
            "a/${_CHAPTERQUIZ_SELF_REF}/b"
        );
        assert_eq!(resolve_env_vars("${_CHAPTERQUIZ_UNSET_VAR}x"), "x");
        std::env::remove_var("_CHAPTERQUIZ_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = ChapterquizConfig::default();
        assert_eq!(
            config.source,
            SourceConfig::Directory {
                path: PathBuf::from("./questions")
            }
        );
        assert_eq!(config.results_dir, PathBuf::from("./chapterquiz-results"));
    }

    #[test]
    fn parse_source_config() {
        let toml_str = r#"
results_dir = "/tmp/results"

[source]
type = "http"
base_url = "https://quiz.example.com"
"#;
        let config: ChapterquizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Http {
                base_url: "https://quiz.example.com".into()
            }
        );

        let dir_only: ChapterquizConfig = toml::from_str("[source]\ntype = \"directory\"\n").unwrap();
        assert_eq!(dir_only.source, SourceConfig::default());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("chapterquiz.toml");
        std::fs::write(&path, "[source]\ntype = \"directory\"\npath = \"content\"\n").unwrap();
        assert!(load_config_from(Some(&path)).is_ok());

        std::fs::write(&path, "[source]\ntype = \"ftp\"\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }

    #[test]
    fn create_source_by_type() {
        let source = create_source(&SourceConfig::Http {
            base_url: "http://localhost:5173".into(),
        });
        assert_eq!(source.name(), "http");
        assert_eq!(create_source(&SourceConfig::default()).name(), "directory");
    }
}
