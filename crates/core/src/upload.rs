//! Upload handling.
//!
//! Validates an incoming file, derives a collision-free stored name from its original name and
//! writes it to the blob store.

use crate::validation::validate_upload;
use crate::{CoreConfig, CoreError, CoreResult};
use sharebox_files::naming::clean_file_name;
use sharebox_files::BlobStore;
use std::sync::Arc;

/// A single file received from a client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name as sent by the client, possibly percent-encoded.
    pub original_name: String,
    /// Declared MIME type.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the blob was stored under.
    pub stored_name: String,
    /// Name as sent by the client.
    pub original_name: String,
    /// Public URL of the stored blob.
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

#[derive(Clone, Debug)]
pub struct UploadService {
    cfg: Arc<CoreConfig>,
    store: BlobStore,
}

impl UploadService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = BlobStore::new(cfg.upload_dir());
        Self { cfg, store }
    }

    /// Validates and stores an upload.
    ///
    /// `None` means the client sent no file part at all.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if:
    /// - no file was provided (`MissingFile`),
    /// - the declared type is not allowed (`UnsupportedType`),
    /// - the payload exceeds the configured limit (`TooLarge`),
    /// - the blob cannot be written (`Files`).
    pub fn upload(&self, request: Option<UploadRequest>) -> CoreResult<UploadedFile> {
        let request = request.ok_or(CoreError::MissingFile)?;
        let size = request.bytes.len() as u64;

        validate_upload(&request.content_type, size, self.cfg.max_upload_bytes())?;

        let desired = clean_file_name(&request.original_name);
        let blob = self.store.store_unique(&desired, &request.bytes)?;

        tracing::info!(
            "stored upload {:?} as {} ({} bytes)",
            request.original_name,
            blob.name,
            size
        );

        Ok(UploadedFile {
            url: self.cfg.public_url(blob.name.as_str()),
            stored_name: blob.name.into_string(),
            original_name: request.original_name,
            size,
            content_type: request.content_type,
        })
    }
}
