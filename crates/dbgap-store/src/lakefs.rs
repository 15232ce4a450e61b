//! lakeFS-backed object store.
//!
//! Speaks the lakeFS REST API directly, authenticating with the same
//! environment variables the lakectl client uses. Listing is
//! non-recursive (delimiter `/`) and paginated; pages are followed until
//! exhaustion. There is no retry or backoff here: a connectivity failure
//! aborts the caller's whole run.

use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::node::RawEntry;
use crate::ObjectStore;

/// Environment variable naming the lakeFS server endpoint.
pub const ENDPOINT_VAR: &str = "LAKECTL_SERVER_ENDPOINT_URL";
/// Environment variable naming the access key id.
pub const ACCESS_KEY_VAR: &str = "LAKECTL_CREDENTIALS_ACCESS_KEY_ID";
/// Environment variable naming the secret access key.
pub const SECRET_KEY_VAR: &str = "LAKECTL_CREDENTIALS_SECRET_ACCESS_KEY";

const PAGE_SIZE: &str = "1000";
const USER_AGENT: &str = concat!("dbgap-index/", env!("CARGO_PKG_VERSION"));

/// An [`ObjectStore`] backed by a lakeFS server.
#[derive(Debug, Clone)]
pub struct LakeFsStore {
    client: Client,
    endpoint: String,
    access_key: String,
    secret_key: String,
}

impl LakeFsStore {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|source| StoreError::Client { source })?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint,
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        })
    }

    /// Build a store from the `LAKECTL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(
            require_env(ENDPOINT_VAR)?,
            require_env(ACCESS_KEY_VAR)?,
            require_env(SECRET_KEY_VAR)?,
        )
    }

    fn list_url(&self, repository: &str, branch: &str) -> String {
        format!(
            "{}/api/v1/repositories/{repository}/refs/{branch}/objects/ls",
            self.endpoint
        )
    }

    fn object_url(&self, repository: &str, branch: &str) -> String {
        format!(
            "{}/api/v1/repositories/{repository}/refs/{branch}/objects",
            self.endpoint
        )
    }
}

impl ObjectStore for LakeFsStore {
    fn list(&self, path: &str) -> Result<Vec<RawEntry>> {
        let (repository, branch, key) = split_store_path(path)?;
        let prefix = directory_prefix(key);
        let url = self.list_url(repository, branch);

        let mut entries = Vec::new();
        let mut after = String::new();
        loop {
            debug!(url = %url, prefix = %prefix, after = %after, "listing lakeFS objects");
            let response = self
                .client
                .get(&url)
                .basic_auth(&self.access_key, Some(&self.secret_key))
                .query(&[
                    ("prefix", prefix.as_str()),
                    ("delimiter", "/"),
                    ("after", after.as_str()),
                    ("amount", PAGE_SIZE),
                ])
                .send()
                .map_err(|source| StoreError::Request {
                    url: url.clone(),
                    source,
                })?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(StoreError::NotFound {
                    path: path.to_string(),
                });
            }
            if !status.is_success() {
                return Err(StoreError::Status {
                    url,
                    status: status.as_u16(),
                });
            }
            let page: ListingPage = response.json().map_err(|source| StoreError::Request {
                url: url.clone(),
                source,
            })?;
            for stats in page.results {
                entries.push(lift_object_stats(repository, branch, stats));
            }
            if page.pagination.has_more {
                after = page.pagination.next_offset;
            } else {
                break;
            }
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &str) -> Result<String> {
        let (repository, branch, key) = split_store_path(path)?;
        let url = self.object_url(repository, branch);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .query(&[("path", key)])
            .send()
            .map_err(|source| StoreError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response.text().map_err(|source| StoreError::Request {
            url: url.clone(),
            source,
        })
    }
}

/// One page of a lakeFS listing.
#[derive(Debug, Deserialize)]
struct ListingPage {
    pagination: Pagination,
    results: Vec<ObjectStats>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    has_more: bool,
    next_offset: String,
}

#[derive(Debug, Deserialize)]
struct ObjectStats {
    path: String,
    path_type: String,
}

fn require_env(variable: &'static str) -> Result<String> {
    env::var(variable)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(StoreError::MissingCredentials { variable })
}

/// Split a `<repository>/<branch>/<key…>` store path into its parts.
fn split_store_path(path: &str) -> Result<(&str, &str, &str)> {
    let trimmed = path.trim_start_matches('/');
    let mut parts = trimmed.splitn(3, '/');
    let repository = parts.next().filter(|part| !part.is_empty());
    let branch = parts.next().filter(|part| !part.is_empty());
    match (repository, branch) {
        (Some(repository), Some(branch)) => Ok((repository, branch, parts.next().unwrap_or(""))),
        _ => Err(StoreError::InvalidPath {
            path: path.to_string(),
        }),
    }
}

/// lakeFS wants directory prefixes to end in the delimiter.
fn directory_prefix(key: &str) -> String {
    if key.is_empty() || key.ends_with('/') {
        key.to_string()
    } else {
        format!("{key}/")
    }
}

/// Map a lakeFS result onto a raw entry with a full store path.
///
/// `common_prefix` and `object` are the two types the API documents;
/// anything else is passed through verbatim so the caller's lift step
/// rejects it instead of this client guessing.
fn lift_object_stats(repository: &str, branch: &str, stats: ObjectStats) -> RawEntry {
    let kind = match stats.path_type.as_str() {
        "common_prefix" => "directory".to_string(),
        "object" => "object".to_string(),
        other => other.to_string(),
    };
    let key = stats.path.trim_end_matches('/');
    RawEntry::new(format!("{repository}/{branch}/{key}"), kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_repository_branch_and_key() {
        let (repository, branch, key) = split_store_path("heal-studies/v2.0/a/b.xml").unwrap();
        assert_eq!(repository, "heal-studies");
        assert_eq!(branch, "v2.0");
        assert_eq!(key, "a/b.xml");

        let (_, _, key) = split_store_path("repo/main/").unwrap();
        assert_eq!(key, "");
    }

    #[test]
    fn rejects_paths_without_repository_or_branch() {
        assert!(matches!(
            split_store_path("repo"),
            Err(StoreError::InvalidPath { .. })
        ));
        assert!(matches!(
            split_store_path("/"),
            Err(StoreError::InvalidPath { .. })
        ));
    }

    #[test]
    fn directory_prefixes_end_with_delimiter() {
        assert_eq!(directory_prefix(""), "");
        assert_eq!(directory_prefix("a/b"), "a/b/");
        assert_eq!(directory_prefix("a/b/"), "a/b/");
    }

    #[test]
    fn listing_page_deserializes_with_pagination() {
        let json = r#"{
            "pagination": {"has_more": true, "next_offset": "dir/zz.xml", "results": 2, "max_per_page": 1000},
            "results": [
                {"path": "dir/", "path_type": "common_prefix"},
                {"path": "dd.xml", "path_type": "object", "size_bytes": 12}
            ]
        }"#;
        let page: ListingPage = serde_json::from_str(json).unwrap();
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.next_offset, "dir/zz.xml");
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn lifts_lakefs_path_types() {
        let directory = lift_object_stats(
            "repo",
            "main",
            ObjectStats {
                path: "dir/".to_string(),
                path_type: "common_prefix".to_string(),
            },
        );
        assert_eq!(directory, RawEntry::new("repo/main/dir", "directory"));

        let object = lift_object_stats(
            "repo",
            "main",
            ObjectStats {
                path: "dir/dd.xml".to_string(),
                path_type: "object".to_string(),
            },
        );
        assert_eq!(object, RawEntry::new("repo/main/dir/dd.xml", "object"));

        let strange = lift_object_stats(
            "repo",
            "main",
            ObjectStats {
                path: "dir/weird".to_string(),
                path_type: "import".to_string(),
            },
        );
        assert_eq!(strange.kind, "import");
    }
}
