//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.
//!
//! Environment variables (read by [`CoreConfig::from_env`]):
//! - `SHAREBOX_UPLOAD_DIR`: Blob store directory (default: `public/uploads`)
//! - `SHAREBOX_SHARE_FILE`: Share registry JSON file (default: `data/shares.json`)
//! - `SHAREBOX_PUBLIC_PATH`: URL prefix blobs are served under (default: `/uploads`)
//! - `SHAREBOX_MAX_UPLOAD_BYTES`: Upload size limit in bytes (default: 10 MiB)

use crate::constants::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PUBLIC_PATH, DEFAULT_SHARE_FILE, DEFAULT_UPLOAD_DIR,
};
use crate::{CoreError, CoreResult};
use sharebox_files::naming::encode_component;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    upload_dir: PathBuf,
    share_file: PathBuf,
    public_path: String,
    max_upload_bytes: u64,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if:
    /// - `public_path` does not start with `/` or ends with `/`,
    /// - `max_upload_bytes` is zero.
    pub fn new(
        upload_dir: PathBuf,
        share_file: PathBuf,
        public_path: String,
        max_upload_bytes: u64,
    ) -> CoreResult<Self> {
        if !public_path.starts_with('/') || (public_path.len() > 1 && public_path.ends_with('/'))
        {
            return Err(CoreError::InvalidInput(format!(
                "public path must start with '/' and must not end with '/': {}",
                public_path
            )));
        }

        if public_path == "/" {
            return Err(CoreError::InvalidInput(
                "public path cannot be the site root".into(),
            ));
        }

        if max_upload_bytes == 0 {
            return Err(CoreError::InvalidInput(
                "max upload size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            upload_dir,
            share_file,
            public_path,
            max_upload_bytes,
        })
    }

    /// Configuration with every default applied, rooted at `base_dir`.
    ///
    /// Relative default paths are joined onto `base_dir`; useful for tests and for running out
    /// of a data directory other than the working directory.
    pub fn with_defaults(base_dir: &Path) -> Self {
        Self {
            upload_dir: base_dir.join(DEFAULT_UPLOAD_DIR),
            share_file: base_dir.join(DEFAULT_SHARE_FILE),
            public_path: DEFAULT_PUBLIC_PATH.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `SHAREBOX_MAX_UPLOAD_BYTES` is not a number or the
    /// resulting values fail [`CoreConfig::new`] validation.
    pub fn from_env() -> CoreResult<Self> {
        let upload_dir = std::env::var("SHAREBOX_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));
        let share_file = std::env::var("SHAREBOX_SHARE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SHARE_FILE));
        let public_path =
            std::env::var("SHAREBOX_PUBLIC_PATH").unwrap_or_else(|_| DEFAULT_PUBLIC_PATH.into());
        let max_upload_bytes =
            max_upload_bytes_from_env_value(std::env::var("SHAREBOX_MAX_UPLOAD_BYTES").ok())?;

        Self::new(upload_dir, share_file, public_path, max_upload_bytes)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn share_file(&self) -> &Path {
        &self.share_file
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Public URL of a stored blob: the public path joined with the percent-encoded name.
    pub fn public_url(&self, stored_name: &str) -> String {
        format!("{}/{}", self.public_path, encode_component(stored_name))
    }
}

/// Parse the upload size limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default limit.
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> CoreResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_MAX_UPLOAD_BYTES),
        Some(v) => v.parse::<u64>().map_err(|e| {
            CoreError::InvalidInput(format!(
                "SHAREBOX_MAX_UPLOAD_BYTES must be a whole number of bytes ('{}'): {}",
                v, e
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_with_public_path(public_path: &str) -> CoreResult<CoreConfig> {
        CoreConfig::new(
            PathBuf::from("uploads"),
            PathBuf::from("shares.json"),
            public_path.into(),
            DEFAULT_MAX_UPLOAD_BYTES,
        )
    }

    #[test]
    fn test_public_path_validation() {
        assert!(cfg_with_public_path("/uploads").is_ok());
        assert!(cfg_with_public_path("/static/files").is_ok());
        assert!(cfg_with_public_path("uploads").is_err());
        assert!(cfg_with_public_path("/uploads/").is_err());
        assert!(cfg_with_public_path("/").is_err());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let err = CoreConfig::new(
            PathBuf::from("uploads"),
            PathBuf::from("shares.json"),
            "/uploads".into(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_public_url_encodes_name() {
        let cfg = cfg_with_public_path("/uploads").unwrap();
        assert_eq!(cfg.public_url("a b.txt"), "/uploads/a%20b.txt");
        assert_eq!(cfg.public_url("报告.pdf"), "/uploads/%E6%8A%A5%E5%91%8A.pdf");
    }

    #[test]
    fn test_with_defaults_joins_base_dir() {
        let cfg = CoreConfig::with_defaults(Path::new("/srv/sharebox"));
        assert_eq!(cfg.upload_dir(), Path::new("/srv/sharebox/public/uploads"));
        assert_eq!(cfg.share_file(), Path::new("/srv/sharebox/data/shares.json"));
        assert_eq!(cfg.public_path(), "/uploads");
        assert_eq!(cfg.max_upload_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_max_upload_bytes_from_env_value() {
        assert_eq!(
            max_upload_bytes_from_env_value(None).unwrap(),
            DEFAULT_MAX_UPLOAD_BYTES
        );
        assert_eq!(
            max_upload_bytes_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_MAX_UPLOAD_BYTES
        );
        assert_eq!(
            max_upload_bytes_from_env_value(Some("1024".into())).unwrap(),
            1024
        );
        assert!(max_upload_bytes_from_env_value(Some("ten".into())).is_err());
    }
}
