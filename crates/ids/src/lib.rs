//! Share link identifiers.
//!
//! A share link is only as private as its identifier is hard to guess, so sharebox identifiers
//! carry **128 bits** of randomness drawn from the operating system's CSPRNG via `rand`.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `9f86d081884c7d659a2feaa0c55ad015`
//!
//! Use [`ShareId::parse`] where an identifier must be canonical. Registries may hold older,
//! shorter identifiers, so deserialisation and lookups go through [`ShareId::from_stored`], which
//! accepts any non-empty lowercase hex. Uppercase or otherwise malformed values are rejected
//! rather than normalised, so one link never has two spellings.

mod share_id;

pub use share_id::{ShareId, SHARE_ID_BYTES};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
