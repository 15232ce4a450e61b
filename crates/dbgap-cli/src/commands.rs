use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use dbgap_cli::repos::collect_repositories;
use dbgap_core::{IndexRun, build_index};
use dbgap_model::RepositoryRef;
use dbgap_report::{duplicate_report, write_coverage_matrix, write_index_dump};
use dbgap_store::{FsStore, LakeFsStore, ObjectStore};

use crate::cli::{CoverageArgs, IndexArgs, RepoArgs};
use crate::summary::print_run_summary;

/// Run the duplicate scan; the returned count becomes the exit code.
pub fn run_duplicates(args: &RepoArgs) -> Result<usize> {
    let (run, _) = index_repositories(args)?;
    let report = duplicate_report(&run.index);
    let json = report.to_json().context("render duplicate report")?;
    println!("{json}");
    print_run_summary(&run.stats);
    info!(
        duplicate_study_ids = report.duplicate_count(),
        "duplicate scan complete"
    );
    Ok(report.duplicate_count())
}

pub fn run_coverage(args: &CoverageArgs) -> Result<()> {
    let (run, repositories) = index_repositories(&args.repos)?;
    let writer = open_output(&args.output)?;
    write_coverage_matrix(&run.index, &repositories, writer)
        .with_context(|| format!("write coverage matrix to {}", display_output(&args.output)))?;
    print_run_summary(&run.stats);
    info!(
        study_ids = run.index.len(),
        repositories = repositories.len(),
        "coverage matrix written"
    );
    Ok(())
}

pub fn run_index(args: &IndexArgs) -> Result<()> {
    let (run, _) = index_repositories(&args.repos)?;
    let writer = open_output(&args.output)?;
    write_index_dump(&run.index, writer)
        .with_context(|| format!("write index dump to {}", display_output(&args.output)))?;
    print_run_summary(&run.stats);
    info!(
        study_ids = run.index.len(),
        records = run.index.record_count(),
        "index dump written"
    );
    Ok(())
}

/// Resolve repositories and the backing store, then build the index.
fn index_repositories(args: &RepoArgs) -> Result<(IndexRun, Vec<RepositoryRef>)> {
    let repositories =
        collect_repositories(&args.repositories, args.repository_list.as_deref())?;
    let store = open_store(args)?;
    let run = build_index(store.as_ref(), &repositories)?;
    Ok((run, repositories))
}

fn open_store(args: &RepoArgs) -> Result<Box<dyn ObjectStore>> {
    match &args.local_root {
        Some(root) => Ok(Box::new(FsStore::new(root))),
        None => {
            let store = LakeFsStore::from_env().context("configure lakeFS client")?;
            Ok(Box::new(store))
        }
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        let file =
            File::create(path).with_context(|| format!("create output file {path}"))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn display_output(path: &str) -> &str {
    if path == "-" { "stdout" } else { path }
}
