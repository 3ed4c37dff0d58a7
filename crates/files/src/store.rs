//! Flat-directory blob store implementation
//!
//! This module provides [`BlobStore`], which owns the bytes of every upload. Blobs are keyed by
//! their stored name and live directly under the store root:
//!
//! ```text
//! <root>/
//! ├── report.pdf
//! └── report_1.pdf
//! ```
//!
//! # Security Model
//!
//! - Writes and existence checks take a [`StoredName`], which cannot contain separators or dot
//!   segments, so they can only ever touch direct children of the root
//! - [`BlobStore::delete`] accepts a free-form relative path (the HTTP layer hands it whatever
//!   the client sent) and normalises it lexically before touching the filesystem
//!
//! # Implementation Notes
//!
//! - The root directory is created lazily on first write
//! - The service is stateless apart from its root path and is cheap to clone

use crate::naming::candidate_name;
use crate::{FilesError, MAX_NAME_ATTEMPTS};
use chrono::{DateTime, Utc};
use sharebox_types::StoredName;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

/// A blob as seen by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BlobEntry {
    /// Stored name of the blob
    pub name: StoredName,

    /// Size of the blob in bytes
    pub size_bytes: u64,

    /// Birth time where the platform records it, otherwise last modification time
    pub created_at: DateTime<Utc>,
}

/// Result of writing a new blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// The collision-free name the blob was written under
    pub name: StoredName,

    /// Absolute or root-relative path of the written file
    pub path: PathBuf,

    /// Number of bytes written
    pub size_bytes: u64,
}

/// Service for storing, listing and deleting blobs in a single directory
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Creates a store rooted at `root`.
    ///
    /// No I/O happens here; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a blob with this name would occupy.
    #[must_use]
    pub fn path_of(&self, name: &StoredName) -> PathBuf {
        self.root.join(name)
    }

    /// Returns true if a regular file with this stored name exists.
    pub fn exists(&self, name: &StoredName) -> bool {
        self.path_of(name).is_file()
    }

    /// Creates the root directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - The root path exists but is not a directory
    /// - Directory creation fails (I/O)
    pub fn ensure_root(&self) -> Result<(), FilesError> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                self.root.display()
            )));
        }
        fs::create_dir_all(&self.root).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create upload directory {}: {}",
                    self.root.display(),
                    e
                ),
            ))
        })
    }

    /// Writes `bytes` under `desired`, or under the first free `_N` variant of it
    ///
    /// Each candidate is claimed with `create_new`, which fails atomically if the file already
    /// exists. Two concurrent uploads of the same name therefore end up under different names
    /// instead of one overwriting the other.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - The root directory cannot be created
    /// - All [`MAX_NAME_ATTEMPTS`] candidates are taken
    /// - Writing the bytes fails; the partially written file is removed first
    pub fn store_unique(
        &self,
        desired: &StoredName,
        bytes: &[u8],
    ) -> Result<StoredBlob, FilesError> {
        self.ensure_root()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = candidate_name(desired, attempt);
            let path = self.path_of(&name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(FilesError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create {}: {}", path.display(), e),
                    )))
                }
            };

            if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path) {
                    tracing::warn!(
                        "failed to remove partial upload {}: {}",
                        path.display(),
                        cleanup
                    );
                }
                return Err(FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write file to {}: {}", path.display(), e),
                )));
            }

            return Ok(StoredBlob {
                name,
                path,
                size_bytes: bytes.len() as u64,
            });
        }

        Err(FilesError::NamesExhausted(
            desired.to_string(),
            MAX_NAME_ATTEMPTS,
        ))
    }

    /// Lists every regular file in the store, ordered by stored name
    ///
    /// A store whose root does not exist yet is empty. Entries whose names are not valid UTF-8
    /// stored names, directories and symlinks are skipped.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the directory or an entry's metadata cannot be read.
    pub fn list(&self) -> Result<Vec<BlobEntry>, FilesError> {
        let iter = match fs::read_dir(&self.root) {
            Ok(iter) => iter,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read directory {}: {}", self.root.display(), e),
                )))
            }
        };

        let mut entries = Vec::new();
        for entry in iter {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let raw_name = entry.file_name();
            let Some(name) = raw_name.to_str().and_then(|s| StoredName::new(s).ok()) else {
                tracing::warn!("skipping unreadable file name: {:?}", raw_name);
                continue;
            };

            let metadata = entry.metadata()?;
            let created = metadata.created().or_else(|_| metadata.modified())?;

            entries.push(BlobEntry {
                name,
                size_bytes: metadata.len(),
                created_at: DateTime::<Utc>::from(created),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Resolves a client-supplied relative path to a location inside the root
    ///
    /// Normalisation is purely lexical: `.` segments are dropped and `..` pops the previous
    /// segment. The path is rejected if a `..` would climb above the root, if it is absolute or
    /// carries a drive prefix, or if nothing is left after normalisation.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidPath` for any of the rejected cases above.
    pub fn resolve_within_root(&self, relative: &str) -> Result<PathBuf, FilesError> {
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(FilesError::InvalidPath(format!(
                            "path escapes upload directory: {}",
                            relative
                        )));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FilesError::InvalidPath(format!(
                        "absolute paths are not allowed: {}",
                        relative
                    )));
                }
            }
        }

        if parts.is_empty() {
            return Err(FilesError::InvalidPath(format!(
                "path does not name a file: {:?}",
                relative
            )));
        }

        Ok(parts
            .into_iter()
            .fold(self.root.clone(), |acc, part| acc.join(part)))
    }

    /// Deletes the blob at a client-supplied relative path
    ///
    /// The path is validated with [`Self::resolve_within_root`] before any filesystem access.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - The path is rejected (`InvalidPath`)
    /// - Nothing exists at the resolved location (`NotFound`)
    /// - The resolved location is a directory (`InvalidPath`)
    /// - Removal fails (I/O)
    pub fn delete(&self, relative: &str) -> Result<(), FilesError> {
        let path = self.resolve_within_root(relative)?;

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FilesError::NotFound(relative.to_owned()))
            }
            Err(e) => return Err(FilesError::Io(e)),
        };

        if metadata.is_dir() {
            return Err(FilesError::InvalidPath(format!(
                "not a file: {}",
                relative
            )));
        }

        fs::remove_file(&path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to delete {}: {}", path.display(), e),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(s: &str) -> StoredName {
        StoredName::new(s).unwrap()
    }

    fn store_in(temp: &TempDir) -> BlobStore {
        BlobStore::new(temp.path().join("uploads"))
    }

    #[test]
    fn test_store_creates_root_on_first_write() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(!store.root().exists());

        let blob = store.store_unique(&name("a.txt"), b"hello").unwrap();

        assert!(store.root().is_dir());
        assert_eq!(blob.name.as_str(), "a.txt");
        assert_eq!(blob.size_bytes, 5);
        assert_eq!(fs::read(&blob.path).unwrap(), b"hello");
    }

    #[test]
    fn test_store_appends_suffix_on_collision() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let first = store.store_unique(&name("report.pdf"), b"one").unwrap();
        let second = store.store_unique(&name("report.pdf"), b"two").unwrap();
        let third = store.store_unique(&name("report.pdf"), b"three").unwrap();

        assert_eq!(first.name.as_str(), "report.pdf");
        assert_eq!(second.name.as_str(), "report_1.pdf");
        assert_eq!(third.name.as_str(), "report_2.pdf");
        assert_eq!(fs::read(store.path_of(&first.name)).unwrap(), b"one");
        assert_eq!(fs::read(store.path_of(&second.name)).unwrap(), b"two");
    }

    #[test]
    fn test_store_skips_suffixes_already_taken() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.ensure_root().unwrap();
        fs::write(store.root().join("x.txt"), "").unwrap();
        fs::write(store.root().join("x_1.txt"), "").unwrap();

        let blob = store.store_unique(&name("x.txt"), b"new").unwrap();
        assert_eq!(blob.name.as_str(), "x_2.txt");
    }

    #[test]
    fn test_concurrent_same_name_writes_never_overwrite() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .store_unique(&name("same.txt"), format!("{}", i).as_bytes())
                        .unwrap()
                })
            })
            .collect();
        let mut names: Vec<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap().name.into_string())
            .collect();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), 8);
        assert_eq!(store.list().unwrap().len(), 8);
    }

    #[test]
    fn test_ensure_root_rejects_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("uploads");
        fs::write(&root, "not a directory").unwrap();

        let store = BlobStore::new(&root);
        assert!(matches!(
            store.ensure_root(),
            Err(FilesError::InvalidRootDirectory(_))
        ));
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store_in(&temp).list().unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_by_name_and_skips_directories() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.store_unique(&name("b.png"), &[0u8; 3]).unwrap();
        store.store_unique(&name("a.pdf"), &[0u8; 7]).unwrap();
        fs::create_dir(store.root().join("nested")).unwrap();

        let entries = store.list().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.png"]);
        assert_eq!(entries[0].size_bytes, 7);
        assert_eq!(entries[1].size_bytes, 3);
    }

    #[test]
    fn test_exists() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(!store.exists(&name("a.txt")));
        store.store_unique(&name("a.txt"), b"").unwrap();
        assert!(store.exists(&name("a.txt")));
    }

    #[test]
    fn test_resolve_within_root() {
        let store = BlobStore::new("/srv/uploads");
        assert_eq!(
            store.resolve_within_root("a.txt").unwrap(),
            PathBuf::from("/srv/uploads/a.txt")
        );
        assert_eq!(
            store.resolve_within_root("./sub/../a.txt").unwrap(),
            PathBuf::from("/srv/uploads/a.txt")
        );

        for bad in ["../a.txt", "../../etc/passwd", "sub/../../a.txt", "/etc/passwd", "", ".", "sub/.."] {
            assert!(
                matches!(store.resolve_within_root(bad), Err(FilesError::InvalidPath(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_delete_removes_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let blob = store.store_unique(&name("gone.txt"), b"x").unwrap();

        store.delete("gone.txt").unwrap();
        assert!(!blob.path.exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.ensure_root().unwrap();

        assert!(matches!(store.delete("nope.txt"), Err(FilesError::NotFound(_))));
    }

    #[test]
    fn test_delete_traversal_leaves_outside_file_untouched() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.ensure_root().unwrap();
        let outside = temp.path().join("secret.txt");
        fs::write(&outside, "keep me").unwrap();

        let result = store.delete("../secret.txt");

        assert!(matches!(result, Err(FilesError::InvalidPath(_))));
        assert_eq!(fs::read_to_string(&outside).unwrap(), "keep me");
    }

    #[test]
    fn test_delete_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::create_dir_all(store.root().join("nested")).unwrap();

        assert!(matches!(store.delete("nested"), Err(FilesError::InvalidPath(_))));
        assert!(store.root().join("nested").is_dir());
    }
}
