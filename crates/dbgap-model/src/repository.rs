//! Repository references: the unit a traversal operates on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Branch used when a reference does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// An object-store repository name plus the branch or tag to read.
///
/// Written as `name` or `name:branch` on the command line, e.g.
/// `heal-mds-import` or `heal-studies:v2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub branch: String,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// Root path of this reference inside the object store.
    pub fn root_path(&self) -> String {
        format!("{}/{}/", self.name, self.branch)
    }
}

impl FromStr for RepositoryRef {
    type Err = ModelError;

    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let (name, branch) = match reference.split_once(':') {
            Some((name, branch)) => (name, branch),
            None => (reference, DEFAULT_BRANCH),
        };
        if name.is_empty() || branch.is_empty() {
            return Err(ModelError::InvalidRepositoryRef {
                reference: reference.to_string(),
            });
        }
        Ok(Self::new(name, branch))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.branch)
    }
}
