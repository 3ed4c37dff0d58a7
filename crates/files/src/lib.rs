//! sharebox File Storage
//!
//! This crate provides the blob store behind sharebox uploads: a single flat directory where
//! each uploaded file lives under its *stored name*.
//!
//! ## Design Principles
//!
//! - The directory listing is the catalogue; there is no separate index to drift out of sync
//! - A stored name is a single path component ([`StoredName`]), so every blob is a direct child
//!   of the store root
//! - Uploads never overwrite: names are claimed with an atomic create-if-absent open, and a
//!   numeric suffix is appended until a free name is found
//! - Deletion accepts a user-supplied path but refuses anything that resolves outside the root
//!
//! ## Storage Layout
//!
//! ```text
//! <upload_dir>/
//! ├── report.pdf
//! ├── report_1.pdf
//! └── 年度报告.docx
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use sharebox_files::{BlobStore, StoredName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = BlobStore::new("public/uploads");
//! let blob = store.store_unique(&StoredName::new("notes.txt")?, b"hello")?;
//! println!("stored as {}", blob.name);
//! # Ok(())
//! # }
//! ```

mod constants;
pub mod naming;
mod store;

pub use constants::{FALLBACK_NAME, MAX_NAME_ATTEMPTS};
pub use sharebox_types::{NameError, StoredName};
pub use store::{BlobEntry, BlobStore, StoredBlob};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Root directory exists but is not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// Path validation failed (directory traversal or otherwise unsafe path)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No blob exists under the requested name
    #[error("File not found: {0}")]
    NotFound(String),

    /// Every candidate name up to the attempt limit was already taken
    #[error("No free name found for {0} after {1} attempts")]
    NamesExhausted(String, usize),

    /// Stored name validation failed
    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
