//! In-memory answer state for one chapter.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Answer;

/// Mapping from question id to the user's current answer.
///
/// Serializes as a plain JSON object so it can be embedded in a persisted
/// attempt or read from an answers file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: BTreeMap<String, Answer>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Replace whatever was recorded for `question_id`.
    pub fn record(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }

    /// Flip `index` in a multiple-choice selection.
    ///
    /// A non-set answer already recorded is discarded first. Deselecting the
    /// last index leaves an empty set recorded, which still counts as
    /// answered.
    pub fn toggle(&mut self, question_id: &str, index: usize) {
        let entry = self
            .answers
            .entry(question_id.to_string())
            .or_insert_with(|| Answer::Indices(BTreeSet::new()));
        if !matches!(entry, Answer::Indices(_)) {
            *entry = Answer::Indices(BTreeSet::new());
        }
        if let Answer::Indices(selected) = entry {
            if !selected.remove(&index) {
                selected.insert(index);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Answer> {
        self.answers.iter()
    }
}

impl IntoIterator for AnswerSheet {
    type Item = (String, Answer);
    type IntoIter = btree_map::IntoIter<String, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.into_iter()
    }
}

impl FromIterator<(String, Answer)> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = (String, Answer)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
