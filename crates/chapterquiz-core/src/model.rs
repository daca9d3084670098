//! Core data model types for chapterquiz.
//!
//! Questions arrive as loosely-shaped JSON records; by the time they reach
//! this module they have been normalized into a `QuestionKind` that carries
//! exactly the ground truth its type needs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One assessment item in a chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// Identifier, unique within the chapter and stable across reloads.
    pub id: String,
    /// The question text shown to the user.
    pub stem: String,
    /// Optional image accompanying the stem.
    pub image: Option<String>,
    /// Ordered choices. Empty for fill questions.
    pub options: Vec<ChoiceOption>,
    /// Question type together with its ground truth.
    pub kind: QuestionKind,
    /// Explanation shown after submission.
    pub explain: Option<String>,
}

impl Question {
    /// The plain type tag of this question.
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Whether this question takes part in automatic scoring.
    pub fn is_gradable(&self) -> bool {
        !matches!(self.kind, QuestionKind::Fill)
    }
}

/// A single choice entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChoiceOption {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

/// Question type with the ground truth that type needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one correct option.
    Single { answer_index: usize },
    /// A set of correct options; order is irrelevant.
    Multiple { answer_indices: BTreeSet<usize> },
    /// Free text, never auto-scored.
    Fill,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Single { .. } => QuestionType::Single,
            QuestionKind::Multiple { .. } => QuestionType::Multiple,
            QuestionKind::Fill => QuestionType::Fill,
        }
    }

    /// Whether option `index` is part of the correct answer.
    pub fn is_correct_option(&self, index: usize) -> bool {
        match self {
            QuestionKind::Single { answer_index } => *answer_index == index,
            QuestionKind::Multiple { answer_indices } => answer_indices.contains(&index),
            QuestionKind::Fill => false,
        }
    }
}

/// The bare type tag, as written in question JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
    Fill,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
            QuestionType::Fill => "fill",
        };
        f.pad(name)
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionType::Single),
            "multiple" => Ok(QuestionType::Multiple),
            "fill" => Ok(QuestionType::Fill),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A user's response to one question.
///
/// Serialized untagged so a persisted answer map reads as plain JSON:
/// a number, an array of numbers, or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Index(usize),
    Indices(BTreeSet<usize>),
    Text(String),
}
