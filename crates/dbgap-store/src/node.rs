//! Raw listing entries and their typed form.

use crate::error::StoreError;

/// Entry as reported by a backing store listing: a full store path plus
/// the store's own type string, normalized to `directory`/`object` by the
/// store implementation where it can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub path: String,
    pub kind: String,
}

impl RawEntry {
    pub fn new(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}

/// A classified node in a repository tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A directory to recurse into.
    Directory { path: String },
    /// A leaf object readable as text.
    Object { path: String },
}

impl TreeNode {
    /// Lift a raw listing entry into the node sum type.
    ///
    /// The type vocabulary is narrow by contract; anything else means the
    /// backing API changed and the traversal must stop rather than guess.
    pub fn from_raw(entry: RawEntry) -> Result<Self, StoreError> {
        match entry.kind.as_str() {
            "directory" => Ok(TreeNode::Directory { path: entry.path }),
            "object" => Ok(TreeNode::Object { path: entry.path }),
            _ => Err(StoreError::UnknownNodeType {
                kind: entry.kind,
                path: entry.path,
            }),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::Directory { path } | TreeNode::Object { path } => path,
        }
    }
}
