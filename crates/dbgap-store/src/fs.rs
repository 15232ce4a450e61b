//! Local-filesystem store, mainly for tests and checked-out trees.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::node::RawEntry;
use crate::ObjectStore;

/// An [`ObjectStore`] backed by a directory on the local filesystem.
///
/// Store paths map directly onto paths below `root`, so a tree laid out
/// as `<root>/<repository>/<branch>/…` behaves exactly like the object
/// store it mirrors.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_matches('/'))
    }
}

impl ObjectStore for FsStore {
    fn list(&self, path: &str) -> Result<Vec<RawEntry>> {
        let dir = self.resolve(path);
        if !dir.exists() {
            return Err(StoreError::NotFound {
                path: path.to_string(),
            });
        }
        let read_dir = fs::read_dir(&dir).map_err(|source| StoreError::List {
            path: path.to_string(),
            source,
        })?;

        let base = path.trim_matches('/');
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| StoreError::List {
                path: path.to_string(),
                source,
            })?;
            let file_type = entry.file_type().map_err(|source| StoreError::List {
                path: path.to_string(),
                source,
            })?;
            let kind = if file_type.is_dir() {
                "directory"
            } else if file_type.is_file() {
                "object"
            } else {
                "unknown"
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(RawEntry::new(format!("{base}/{name}"), kind));
        }
        // Filesystem listing order is arbitrary; keep traversal deterministic.
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn read_to_string(&self, path: &str) -> Result<String> {
        let file = self.resolve(path);
        read_file(&file, path)
    }
}

fn read_file(file: &Path, path: &str) -> Result<String> {
    match fs::read_to_string(file) {
        Ok(text) => Ok(text),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
            path: path.to_string(),
        }),
        Err(source) => Err(StoreError::Read {
            path: path.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, FsStore) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("repo").join("main");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("dd.xml"), "<table study_id=\"phs1\"/>").unwrap();
        fs::write(root.join("notes.txt"), "not xml").unwrap();
        fs::write(root.join("nested").join("inner.XML"), "<t/>").unwrap();
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn lists_sorted_entries_with_kinds() {
        let (_dir, store) = seeded_store();
        let entries = store.list("repo/main/").unwrap();
        let listed: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.path.as_str(), e.kind.as_str()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("repo/main/dd.xml", "object"),
                ("repo/main/nested", "directory"),
                ("repo/main/notes.txt", "object"),
            ]
        );
    }

    #[test]
    fn reads_objects_by_store_path() {
        let (_dir, store) = seeded_store();
        let text = store.read_to_string("repo/main/dd.xml").unwrap();
        assert_eq!(text, "<table study_id=\"phs1\"/>");
    }

    #[test]
    fn missing_paths_surface_as_not_found() {
        let (_dir, store) = seeded_store();
        assert!(matches!(
            store.list("repo/missing/"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.read_to_string("repo/main/missing.xml"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
