//! Persisted attempt snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSheet;
use crate::scoring::{self, ScoreSummary};

/// Summary of the last submission for a chapter.
///
/// Stored as `{ "score", "total", "time", "answers" }` with `time` in epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Sum of credit over gradable questions.
    pub score: f64,
    /// Number of gradable questions.
    pub total: usize,
    /// When the attempt was submitted.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    /// Answers as they stood at submission.
    #[serde(default)]
    pub answers: AnswerSheet,
}

impl AttemptResult {
    pub fn from_summary(summary: &ScoreSummary, answers: AnswerSheet, time: DateTime<Utc>) -> Self {
        Self {
            score: summary.total_score,
            total: summary.gradable_count,
            time,
            answers,
        }
    }

    pub fn percent(&self) -> u32 {
        scoring::percent(self.score, self.total)
    }
}
