//! The single-threaded indexing pipeline: walk, parse, record.
//!
//! Repositories are processed one at a time in the order supplied, and
//! the walk within each repository is strictly sequential. That keeps the
//! run deterministic and means the index needs no synchronization. Any
//! failure aborts the whole run: a partial index would silently
//! under-report exactly the duplicates this tool exists to find.

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use dbgap_ingest::{IngestError, parse_study, walk_repository};
use dbgap_model::RepositoryRef;
use dbgap_store::ObjectStore;

use crate::index::StudyIndex;

/// Per-repository counts accumulated while indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStats {
    pub repository: String,
    pub branch: String,
    /// Number of data dictionaries (XML files) parsed and indexed.
    pub data_dictionaries: usize,
    pub sections: usize,
    pub variables: usize,
}

/// Outcome of one indexing run.
#[derive(Debug, Default)]
pub struct IndexRun {
    pub index: StudyIndex,
    /// One entry per repository argument, in argument order.
    pub stats: Vec<RepositoryStats>,
}

/// Walk every repository in order and build the cross-repository index.
pub fn build_index(store: &dyn ObjectStore, repositories: &[RepositoryRef]) -> Result<IndexRun> {
    let mut run = IndexRun::default();
    for repository in repositories {
        let span = info_span!("index", repository = %repository.name, branch = %repository.branch);
        let _guard = span.enter();
        info!(
            repository = %repository.name,
            branch = %repository.branch,
            "indexing repository"
        );

        let mut stats = RepositoryStats {
            repository: repository.name.clone(),
            branch: repository.branch.clone(),
            ..RepositoryStats::default()
        };
        walk_repository(store, repository, &mut |filepath| {
            let text = store.read_to_string(filepath)?;
            let study = parse_study(&repository.name, filepath, &text).map_err(|source| {
                IngestError::Parse {
                    repository: repository.name.clone(),
                    filepath: filepath.to_string(),
                    source,
                }
            })?;
            debug!(
                study_id = %study.study_id,
                path = %filepath,
                sections = study.section_count(),
                variables = study.variable_count(),
                "indexed data dictionary"
            );
            stats.data_dictionaries += 1;
            stats.sections += study.section_count();
            stats.variables += study.variable_count();
            run.index.record(study);
            Ok(())
        })
        .with_context(|| {
            format!(
                "indexing repository {} at branch {}",
                repository.name, repository.branch
            )
        })?;

        info!(
            repository = %repository.name,
            data_dictionaries = stats.data_dictionaries,
            sections = stats.sections,
            variables = stats.variables,
            "repository indexed"
        );
        run.stats.push(stats);
    }
    Ok(run)
}
