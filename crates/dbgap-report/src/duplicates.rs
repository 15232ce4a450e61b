//! The duplicate study report.
//!
//! A study identifier appearing once per repository across many
//! repositories is the normal, intended state of the world. The defect
//! this report surfaces is the same identifier reachable through several
//! distinct file paths inside a *single* repository.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use dbgap_core::StudyIndex;

/// Study identifiers declared by more than one file within a single
/// repository, mapped to the sorted offending file paths.
///
/// Serializes as a plain JSON object with sorted keys; empty means a
/// clean run.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateReport {
    duplicates: BTreeMap<String, Vec<String>>,
}

impl DuplicateReport {
    /// Number of duplicated study identifiers. Doubles as the process
    /// exit code, so a clean run exits zero.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// Offending file paths for `study_id`, if it is duplicated.
    pub fn paths_for(&self, study_id: &str) -> Option<&[String]> {
        self.duplicates.get(study_id).map(Vec::as_slice)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the duplicate report from an index.
pub fn duplicate_report(index: &StudyIndex) -> DuplicateReport {
    let mut duplicates: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (study_id, studies) in index.iter() {
        let mut per_repository: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for study in studies {
            per_repository
                .entry(study.repository.as_str())
                .or_default()
                .insert(study.filepath.as_str());
        }

        // Distinct paths within one repository; one path listed twice
        // (e.g. the same repository walked twice) is not a collision.
        let mut offending: BTreeSet<&str> = BTreeSet::new();
        for paths in per_repository.values() {
            if paths.len() > 1 {
                offending.extend(paths);
            }
        }
        if !offending.is_empty() {
            duplicates.insert(
                study_id.to_string(),
                offending.into_iter().map(String::from).collect(),
            );
        }
    }
    DuplicateReport { duplicates }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dbgap_model::Study;

    fn study(repository: &str, filepath: &str, study_id: &str) -> Study {
        Study {
            repository: repository.to_string(),
            filepath: filepath.to_string(),
            study_id: study_id.to_string(),
            study_name: String::new(),
            study_description: String::new(),
            appl_id: String::new(),
            study_version: String::new(),
            sections: Vec::new(),
        }
    }

    #[test]
    fn unique_studies_produce_an_empty_report() {
        let mut index = StudyIndex::new();
        index.record(study("a", "a/main/one.xml", "phs1"));
        index.record(study("a", "a/main/two.xml", "phs2"));

        let report = duplicate_report(&index);
        assert!(report.is_empty());
        assert_eq!(report.duplicate_count(), 0);
        assert_eq!(report.to_json().unwrap(), "{}");
    }

    #[test]
    fn same_repository_collision_is_reported_with_sorted_paths() {
        let mut index = StudyIndex::new();
        index.record(study("a", "a/main/z/dd.xml", "phs000123"));
        index.record(study("a", "a/main/b/dd.xml", "phs000123"));

        let report = duplicate_report(&index);
        assert_eq!(report.duplicate_count(), 1);
        assert_eq!(
            report.paths_for("phs000123").unwrap(),
            ["a/main/b/dd.xml", "a/main/z/dd.xml"]
        );
    }

    #[test]
    fn cross_repository_presence_is_not_a_duplicate() {
        let mut index = StudyIndex::new();
        index.record(study("a", "a/main/dd.xml", "phs000999"));
        index.record(study("b", "b/main/dd.xml", "phs000999"));

        let report = duplicate_report(&index);
        assert!(report.is_empty());
    }

    #[test]
    fn rewalking_one_repository_is_not_a_collision() {
        let mut index = StudyIndex::new();
        index.record(study("a", "a/main/dd.xml", "phs7"));
        index.record(study("a", "a/main/dd.xml", "phs7"));

        let report = duplicate_report(&index);
        assert!(report.is_empty());
    }

    #[test]
    fn only_offending_repositories_contribute_paths() {
        let mut index = StudyIndex::new();
        index.record(study("a", "a/main/one.xml", "phs5"));
        index.record(study("a", "a/main/two.xml", "phs5"));
        index.record(study("b", "b/main/dd.xml", "phs5"));

        let report = duplicate_report(&index);
        assert_eq!(
            report.paths_for("phs5").unwrap(),
            ["a/main/one.xml", "a/main/two.xml"]
        );
    }
}
