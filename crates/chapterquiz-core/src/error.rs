//! Loader and session error types.
//!
//! `LoadError` is defined here rather than in `chapterquiz-sources` so the
//! session can hold a failed load as its retry state without depending on
//! any concrete source.

use thiserror::Error;

/// Errors that can occur while fetching a chapter or the chapter catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource could not be fetched (connection, timeout, HTTP status).
    #[error("network error: {0}")]
    Network(String),

    /// The resource was fetched but is not valid question JSON.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A local read failed for a reason other than the file being absent.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl LoadError {
    /// Returns `true` if retrying the same load could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::Network(_) | LoadError::Io { .. })
    }
}

/// Errors from driving a quiz session out of order or with bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The chapter has not finished loading (or the load failed).
    #[error("chapter is not ready for answering")]
    NotReady,

    /// The quiz has been submitted; answers are locked until editing resumes.
    #[error("quiz is submitted; return to editing before changing answers")]
    Locked,

    /// The chapter has no questions to submit.
    #[error("chapter has no questions")]
    NoQuestions,

    /// No question with this id exists in the chapter.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// The selection does not fit the question type or its options.
    #[error("invalid answer for question {question_id}: {reason}")]
    InvalidSelection { question_id: String, reason: String },

    /// Some gradable questions have no recorded answer.
    #[error("{} gradable question(s) unanswered: {}", .missing.len(), .missing.join(", "))]
    Incomplete { missing: Vec<String> },
}
