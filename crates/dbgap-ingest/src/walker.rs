//! Depth-first traversal of repository object trees.

use tracing::debug;

use dbgap_model::RepositoryRef;
use dbgap_store::{ObjectStore, TreeNode};

use crate::error::Result;

/// Walk `repository` depth-first, invoking `visit` with the store path of
/// every object whose name ends in `.xml` (case-insensitive).
///
/// Other objects are skipped at debug level; content is never inspected
/// here, so validity checking stays with the parser. Directories recurse.
/// Any listing failure or unclassifiable node aborts the traversal.
pub fn walk_repository<F>(
    store: &dyn ObjectStore,
    repository: &RepositoryRef,
    visit: &mut F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    walk_path(store, &repository.root_path(), visit)
}

fn walk_path<F>(store: &dyn ObjectStore, path: &str, visit: &mut F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    for entry in store.list(path)? {
        match TreeNode::from_raw(entry)? {
            TreeNode::Directory { path } => walk_path(store, &path, visit)?,
            TreeNode::Object { path } => {
                if has_xml_suffix(&path) {
                    visit(&path)?;
                } else {
                    debug!(path = %path, "skipping object without .xml suffix");
                }
            }
        }
    }
    Ok(())
}

fn has_xml_suffix(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.to_ascii_lowercase().ends_with(".xml")
}
