//! File catalogue.
//!
//! There is no persisted catalogue: the blob store directory is the source of truth and every
//! listing is derived from it with stat calls.

use crate::{CoreConfig, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sharebox_files::{BlobStore, StoredName};
use std::sync::Arc;

/// A stored file as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: String,
    pub file_name: String,
    /// The catalogue does not track original names; this is the stored name.
    pub original_name: String,
    pub url: String,
    pub size: u64,
    /// Extension without its dot, empty when there is none.
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CatalogService {
    cfg: Arc<CoreConfig>,
    store: BlobStore,
}

impl CatalogService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = BlobStore::new(cfg.upload_dir());
        Self { cfg, store }
    }

    /// Lists every stored file, ordered by stored name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Files` if the upload directory cannot be read.
    pub fn list(&self) -> CoreResult<Vec<FileDescriptor>> {
        let entries = self.store.list()?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let name = entry.name.as_str().to_owned();
                FileDescriptor {
                    id: name.clone(),
                    file_name: name.clone(),
                    original_name: name.clone(),
                    url: self.cfg.public_url(&name),
                    size: entry.size_bytes,
                    file_type: entry.name.extension().unwrap_or("").to_owned(),
                    created_at: entry.created_at,
                }
            })
            .collect())
    }

    /// Deletes a stored file by its (already percent-decoded) identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Files` wrapping:
    /// - `InvalidPath` if the identifier escapes the upload directory (nothing is touched),
    /// - `NotFound` if no such file exists,
    /// - `Io` if removal fails.
    pub fn delete(&self, id: &str) -> CoreResult<()> {
        match self.store.delete(id) {
            Ok(()) => {
                tracing::info!("deleted file {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("delete of {:?} failed: {}", id, e);
                Err(CoreError::from(e))
            }
        }
    }

    /// Returns true if a stored file with this identifier exists.
    ///
    /// Identifiers that are not valid stored names (separators, dot segments) never exist.
    pub fn exists(&self, id: &str) -> bool {
        StoredName::new(id)
            .map(|name| self.store.exists(&name))
            .unwrap_or(false)
    }
}
