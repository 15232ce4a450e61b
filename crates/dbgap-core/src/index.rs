//! The cross-repository study index.

use std::collections::BTreeMap;

use serde::Serialize;

use dbgap_model::Study;

/// Multimap from study identifier to every parsed record that declared it.
///
/// Append-only for the duration of a run and rebuilt from scratch on
/// every invocation; there is no persistence. The same `study_id`
/// legitimately appears once per repository across many repositories.
/// Several records with the same `(repository, filepath)` mean the same
/// tree was walked more than once; the index keeps them and leaves the
/// interpretation to the reporters.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct StudyIndex {
    studies: BTreeMap<String, Vec<Study>>,
}

impl StudyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `study` under its study identifier.
    pub fn record(&mut self, study: Study) {
        self.studies
            .entry(study.study_id.clone())
            .or_default()
            .push(study);
    }

    /// Records for `study_id` in insertion order; empty if unseen.
    pub fn studies_for(&self, study_id: &str) -> &[Study] {
        self.studies
            .get(study_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Distinct study identifiers in ascending lexical order.
    pub fn study_ids(&self) -> impl Iterator<Item = &str> {
        self.studies.keys().map(String::as_str)
    }

    /// Iterate `(study_id, records)` pairs in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Study])> {
        self.studies
            .iter()
            .map(|(study_id, studies)| (study_id.as_str(), studies.as_slice()))
    }

    /// Number of distinct study identifiers.
    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    /// Total number of study records across all identifiers.
    pub fn record_count(&self) -> usize {
        self.studies.values().map(Vec::len).sum()
    }
}
