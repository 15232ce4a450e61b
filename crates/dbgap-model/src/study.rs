//! Immutable records describing one parsed dbGaP data dictionary.
//!
//! Everything here is built once during parsing and never mutated: the
//! index and the reporters only read these records.

use serde::{Deserialize, Serialize};

/// Section name for variables that carry no grouping attribute at all.
pub const UNSECTIONED: &str = "none";

/// One enumerated code/label pair attached to a categorical variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub code: String,
    pub label: String,
}

/// A single variable from a data dictionary.
///
/// `id` is only unique within the file it came from; `dictionary_id`
/// links the variable back to the table that declared it. The producing
/// generators are inconsistent about which attributes they populate, so
/// both default to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub dictionary_id: String,
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub values: Vec<Value>,
}

/// A group of variables sharing one grouping key.
///
/// The key is taken from a variable's `section` attribute, falling back to
/// `module`, then `dd_id`, then [`UNSECTIONED`]. Variables keep their
/// first-seen document order within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_name: String,
    pub variables: Vec<Variable>,
}

/// One parsed dbGaP XML file.
///
/// `study_id` is the cross-repository join key and is deliberately not
/// unique: the same study legitimately appears in several repositories.
/// `repository` and `filepath` are supplied by the caller that opened the
/// file, since the XML itself carries neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub repository: String,
    pub filepath: String,
    pub study_id: String,
    pub study_name: String,
    pub study_description: String,
    pub appl_id: String,
    pub study_version: String,
    pub sections: Vec<Section>,
}

impl Study {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of variables across all sections.
    pub fn variable_count(&self) -> usize {
        self.sections.iter().map(|s| s.variables.len()).sum()
    }
}
