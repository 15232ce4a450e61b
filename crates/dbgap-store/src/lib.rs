//! Read-only access to trees of named objects.
//!
//! A store presents repositories as paths of the form
//! `<repository>/<branch>/<key…>`. Listing is non-recursive; traversal
//! order and recursion policy belong to the caller.

pub mod error;
pub mod fs;
pub mod lakefs;
pub mod node;

pub use error::{Result, StoreError};
pub use fs::FsStore;
pub use lakefs::LakeFsStore;
pub use node::{RawEntry, TreeNode};

/// Read-only access to a tree of named objects.
///
/// Implementations are pre-authenticated: credential handling happens at
/// construction time, never per call.
pub trait ObjectStore {
    /// List the immediate children of `path`.
    fn list(&self, path: &str) -> Result<Vec<RawEntry>>;

    /// Read the object at `path` as UTF-8 text.
    fn read_to_string(&self, path: &str) -> Result<String>;
}
