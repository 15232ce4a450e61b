//! CLI library components for the dbGaP data-dictionary indexer.

pub mod logging;
pub mod repos;
