use sharebox_files::FilesError;

/// Coarse classification of a [`CoreError`], used by API layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad client input: wrong type, too large, missing field, unsafe path.
    Validation,
    /// The referenced file or share does not exist.
    NotFound,
    /// The share existed but has expired.
    Gone,
    /// Filesystem or registry failure; never shown to clients in detail.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no file provided")]
    MissingFile,
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file size {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("share link not found: {0}")]
    ShareNotFound(String),
    #[error("share link has expired: {0}")]
    ShareExpired(String),

    #[error("file storage error: {0}")]
    Files(#[from] FilesError),
    #[error("failed to read share registry: {0}")]
    RegistryRead(std::io::Error),
    #[error("failed to write share registry: {0}")]
    RegistryWrite(std::io::Error),
    #[error("failed to serialize share registry: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize share registry: {0}")]
    Deserialization(serde_json::Error),
    #[error("share registry lock poisoned")]
    RegistryPoisoned,
}

impl CoreError {
    /// Classifies this error for status-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_)
            | CoreError::MissingFile
            | CoreError::UnsupportedType(_)
            | CoreError::TooLarge { .. } => ErrorKind::Validation,
            CoreError::FileNotFound(_) | CoreError::ShareNotFound(_) => ErrorKind::NotFound,
            CoreError::ShareExpired(_) => ErrorKind::Gone,
            CoreError::Files(FilesError::InvalidPath(_)) => ErrorKind::Validation,
            CoreError::Files(FilesError::NotFound(_)) => ErrorKind::NotFound,
            CoreError::Files(_)
            | CoreError::RegistryRead(_)
            | CoreError::RegistryWrite(_)
            | CoreError::Serialization(_)
            | CoreError::Deserialization(_)
            | CoreError::RegistryPoisoned => ErrorKind::Storage,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
