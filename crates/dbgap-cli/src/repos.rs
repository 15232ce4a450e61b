//! Repository argument handling.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use dbgap_model::RepositoryRef;

/// Merge `--repository` options with an optional newline-delimited list
/// file into the final, ordered set of references.
///
/// Options come first, then file entries, preserving the order given;
/// the coverage matrix columns follow this order. Blank lines and `#`
/// comments in the file are ignored.
pub fn collect_repositories(
    options: &[String],
    list_file: Option<&Path>,
) -> Result<Vec<RepositoryRef>> {
    let mut references = Vec::new();
    for option in options {
        let reference = RepositoryRef::from_str(option)
            .with_context(|| format!("invalid --repository value '{option}'"))?;
        references.push(reference);
    }
    if let Some(path) = list_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read repository list {}", path.display()))?;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let reference = RepositoryRef::from_str(line).with_context(|| {
                format!("invalid repository reference '{line}' in {}", path.display())
            })?;
            references.push(reference);
        }
    }
    if references.is_empty() {
        bail!("no repositories given: use --repository or --repository-list");
    }
    Ok(references)
}
