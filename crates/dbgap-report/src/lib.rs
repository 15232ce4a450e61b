//! Reconciliation reports over the cross-repository study index.

pub mod coverage;
pub mod dump;
pub mod duplicates;

pub use coverage::write_coverage_matrix;
pub use dump::write_index_dump;
pub use duplicates::{DuplicateReport, duplicate_report};
