//! Question set JSON parser.
//!
//! Turns chapter JSON into normalized `Question`s, resolving each record's
//! type exactly once, and validates question sets for authoring defects.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::model::{ChoiceOption, Question, QuestionKind, QuestionType};

/// Raw question record as authored in `ch{id}.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: RawId,
    #[serde(rename = "type", default)]
    declared_type: Option<String>,
    #[serde(default)]
    stem: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    options: Option<Vec<RawOption>>,
    #[serde(default)]
    answer_index: Option<Value>,
    #[serde(default)]
    answer_indices: Option<Value>,
    #[serde(default)]
    explain: Option<String>,
}

/// Ids may be written as strings or integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(s) => write!(f, "{s}"),
            RawId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Options are either bare strings or `{ text, img }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Rich {
        #[serde(default)]
        text: String,
        #[serde(default)]
        img: Option<String>,
    },
}

impl From<RawOption> for ChoiceOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(text) => ChoiceOption { text, image: None },
            RawOption::Rich { text, img } => ChoiceOption { text, image: img },
        }
    }
}

/// Parse chapter JSON into normalized questions.
///
/// A document that is valid JSON but not an array yields an empty set.
pub fn parse_question_set_str(
    content: &str,
    source_name: &str,
) -> std::result::Result<Vec<Question>, LoadError> {
    let parse_err = |message: String| LoadError::Parse {
        source_name: source_name.to_string(),
        message,
    };

    let document: Value = serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?;
    let Value::Array(records) = document else {
        tracing::warn!("{source_name} is not a JSON array, treating as empty");
        return Ok(Vec::new());
    };

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let raw: RawQuestion = serde_json::from_value(record)
                .map_err(|e| parse_err(format!("question #{}: {e}", position + 1)))?;
            Ok(normalize(raw))
        })
        .collect()
}

/// Read and parse a question file from disk.
pub fn parse_question_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let questions = parse_question_set_str(&content, &path.display().to_string())?;
    Ok(questions)
}

fn normalize(raw: RawQuestion) -> Question {
    let kind = resolve_kind(&raw);
    let id = raw.id.into_string();
    let stem = raw
        .stem
        .filter(|s| !s.is_empty())
        .or(raw.title)
        .unwrap_or_default();
    let options = match kind {
        QuestionKind::Fill => Vec::new(),
        _ => raw
            .options
            .unwrap_or_default()
            .into_iter()
            .map(ChoiceOption::from)
            .collect(),
    };

    Question {
        id,
        stem,
        image: raw.image,
        options,
        kind,
        explain: raw.explain.filter(|e| !e.trim().is_empty()),
    }
}

/// Map a raw record to its question kind.
///
/// A declared type is honored when the payload supports it; otherwise the
/// kind is inferred from which answer field is present.
fn resolve_kind(raw: &RawQuestion) -> QuestionKind {
    let declared = raw
        .declared_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<QuestionType>);

    let id = &raw.id;

    match declared {
        None => infer_kind(raw),
        Some(Ok(QuestionType::Fill)) => QuestionKind::Fill,
        Some(Ok(QuestionType::Single)) => match index_value(raw.answer_index.as_ref()) {
            Some(answer_index) => QuestionKind::Single { answer_index },
            None => {
                tracing::warn!("question {id}: declared single without a numeric answerIndex");
                infer_kind(raw)
            }
        },
        Some(Ok(QuestionType::Multiple)) => match index_list(id, raw.answer_indices.as_ref()) {
            Some(answer_indices) => QuestionKind::Multiple { answer_indices },
            None => {
                tracing::warn!("question {id}: declared multiple without an answerIndices list");
                infer_kind(raw)
            }
        },
        Some(Err(e)) => {
            tracing::warn!("question {id}: {e}, inferring from payload");
            infer_kind(raw)
        }
    }
}

fn infer_kind(raw: &RawQuestion) -> QuestionKind {
    if let Some(answer_indices) = index_list(&raw.id, raw.answer_indices.as_ref()) {
        QuestionKind::Multiple { answer_indices }
    } else if let Some(answer_index) = index_value(raw.answer_index.as_ref()) {
        QuestionKind::Single { answer_index }
    } else {
        QuestionKind::Fill
    }
}

fn index_value(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

/// Indices from an `answerIndices` list. Entries that are not non-negative
/// integers are dropped with a warning.
fn index_list(id: &RawId, value: Option<&Value>) -> Option<BTreeSet<usize>> {
    let Some(Value::Array(items)) = value else {
        return None;
    };
    let mut indices = BTreeSet::new();
    for item in items {
        match index_value(Some(item)) {
            Some(i) => {
                indices.insert(i);
            }
            None => tracing::warn!("question {id}: ignoring answerIndices entry {item}"),
        }
    }
    Some(indices)
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common authoring defects.
pub fn validate_question_set(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |id: &str, message: String| {
        warnings.push(ValidationWarning {
            question_id: Some(id.to_string()),
            message,
        })
    };

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(q.id.as_str()) {
            warn(&q.id, format!("duplicate question ID: {}", q.id));
        }
    }

    for q in questions {
        if q.stem.trim().is_empty() && q.image.is_none() {
            warn(&q.id, "stem is empty".into());
        }

        match &q.kind {
            QuestionKind::Single { answer_index } => {
                if q.options.is_empty() {
                    warn(&q.id, "single-choice question has no options".into());
                } else if *answer_index >= q.options.len() {
                    warn(
                        &q.id,
                        format!(
                            "answerIndex {answer_index} is out of range for {} options",
                            q.options.len()
                        ),
                    );
                }
            }
            QuestionKind::Multiple { answer_indices } => {
                if answer_indices.is_empty() {
                    warn(
                        &q.id,
                        "answerIndices is empty; every submission will score 0".into(),
                    );
                }
                if q.options.is_empty() {
                    warn(&q.id, "multiple-choice question has no options".into());
                } else if let Some(bad) = answer_indices.iter().find(|&&i| i >= q.options.len()) {
                    warn(
                        &q.id,
                        format!(
                            "answerIndices entry {bad} is out of range for {} options",
                            q.options.len()
                        ),
                    );
                }
            }
            QuestionKind::Fill => {}
        }
    }

    warnings
}
