//! # sharebox Core
//!
//! Core business logic for the sharebox file sharing service.
//!
//! This crate contains pure data operations over the upload directory and share registry:
//! - Upload validation and collision-free storage ([`upload`])
//! - Catalogue listing and deletion derived from the upload directory ([`catalog`])
//! - Share link creation, listing with lazy expiry, and resolution ([`shares`])
//! - Aggregate file statistics ([`stats`])
//!
//! **No API concerns**: HTTP servers, request parsing and status codes belong in `api-rest`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod shares;
pub mod stats;
pub mod upload;
pub mod validation;

pub use catalog::{CatalogService, FileDescriptor};
pub use config::CoreConfig;
pub use constants::DEFAULT_MAX_UPLOAD_BYTES;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use shares::{ResolvedShare, ShareRecord, ShareService};
pub use sharebox_ids::ShareId;
pub use stats::{compute_stats, FileStats};
pub use upload::{UploadRequest, UploadService, UploadedFile};
