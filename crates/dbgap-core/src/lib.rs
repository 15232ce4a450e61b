//! Cross-repository indexing of dbGaP data dictionaries.

pub mod index;
pub mod pipeline;

pub use index::StudyIndex;
pub use pipeline::{IndexRun, RepositoryStats, build_index};
