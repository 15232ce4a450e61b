//! Error types for object-store access.

use thiserror::Error;

/// Errors raised while talking to a backing object store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Path does not exist in the store.
    #[error("path not found in store: {path}")]
    NotFound { path: String },

    /// Failed to list a directory.
    #[error("failed to list {path}: {source}")]
    List {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an object.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A listing reported a node type the traversal does not understand.
    /// This means the backing API changed, not that the data is bad.
    #[error("unknown node type '{kind}' for {path}")]
    UnknownNodeType { kind: String, path: String },

    /// A store path is missing its repository or branch component.
    #[error("store path '{path}' is missing a repository or branch component")]
    InvalidPath { path: String },

    /// Required credential environment variable is not set.
    #[error("missing lakeFS credentials: set {variable}")]
    MissingCredentials { variable: &'static str },

    /// Failed to construct the HTTP client.
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// An HTTP request failed outright (connection, timeout, decoding).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
