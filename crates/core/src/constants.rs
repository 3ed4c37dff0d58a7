//! Constants used throughout the sharebox core crate.
//!
//! Defaults for configuration and the upload policy live here so the server, the CLI and the
//! tests all agree on them.

/// Default directory for uploaded blobs.
pub const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

/// Default location of the share registry JSON file.
pub const DEFAULT_SHARE_FILE: &str = "data/shares.json";

/// Default public URL prefix under which blobs are served.
pub const DEFAULT_PUBLIC_PATH: &str = "/uploads";

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Largest accepted `expiresIn` magnitude for share links (100 years, in seconds).
pub const MAX_EXPIRES_IN_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;
