//! Implementation of the share identifier type.

use crate::{IdError, IdResult};
use rand::RngCore;
use std::{fmt, str::FromStr};

/// Number of random bytes in a share identifier.
pub const SHARE_ID_BYTES: usize = 16;

/// Longest identifier accepted by [`ShareId::from_stored`].
const MAX_STORED_ID_LEN: usize = 64;

/// A share link identifier.
///
/// Identifiers minted by [`ShareId::generate`] are canonical (32 lowercase hex characters).
/// Identifiers read back from a registry only need to be in stored form (non-empty lowercase
/// hex), so links issued with shorter ids keep working. Either way the value is safe to compare,
/// hash and embed in URLs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareId(String);

impl ShareId {
    /// Generates a fresh identifier from 16 bytes of OS randomness.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SHARE_ID_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Validates and wraps an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> IdResult<Self> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(IdError::InvalidInput(format!(
            "share id must be 32 lowercase hex characters, got: '{}'",
            input
        )))
    }

    /// Wraps an identifier read from persisted state or used to look one up.
    ///
    /// Accepts any non-empty lowercase hex string of at most 64 characters.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not in stored form.
    pub fn from_stored(input: &str) -> IdResult<Self> {
        if Self::is_stored_form(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(IdError::InvalidInput(format!(
            "share id must be lowercase hex, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is non-empty lowercase hex of at most 64 characters.
    pub fn is_stored_form(input: &str) -> bool {
        !input.is_empty()
            && input.len() <= MAX_STORED_ID_LEN
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// This is a purely syntactic check and can be used before calling [`ShareId::parse`].
    pub fn is_canonical(input: &str) -> bool {
        input.len() == SHARE_ID_BYTES * 2
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareId {
    type Err = IdError;

    /// Equivalent to [`ShareId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShareId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShareId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ShareId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShareId::from_stored(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_canonical() {
        let id = ShareId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(ShareId::is_canonical(id.as_str()));
    }

    #[test]
    fn test_generate_does_not_repeat() {
        let ids: HashSet<ShareId> = (0..1_000).map(|_| ShareId::generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_parse_valid_id() {
        let canonical = "9f86d081884c7d659a2feaa0c55ad015";
        let id = ShareId::parse(canonical).unwrap();
        assert_eq!(id.to_string(), canonical);
        assert_eq!(canonical.parse::<ShareId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        for bad in [
            "",
            "9F86D081884C7D659A2FEAA0C55AD015",
            "9f86d081884c7d65",
            "9f86d081884c7d659a2feaa0c55ad015ff",
            "zz86d081884c7d659a2feaa0c55ad015",
            "../86d081884c7d659a2feaa0c55ad01",
        ] {
            match ShareId::parse(bad) {
                Err(IdError::InvalidInput(msg)) => {
                    assert!(msg.contains("32 lowercase hex characters"))
                }
                Ok(_) => panic!("expected '{}' to be rejected", bad),
            }
        }
    }

    #[test]
    fn test_from_stored_accepts_short_hex() {
        let id = ShareId::from_stored("0123456789abcdef").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef");
        assert!(!ShareId::is_canonical(id.as_str()));
    }

    #[test]
    fn test_from_stored_rejects_non_hex() {
        let too_long = "a".repeat(65);
        for bad in ["", "ABCDEF", "../etc", "0123 4567", too_long.as_str()] {
            assert!(ShareId::from_stored(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_serde_accepts_stored_form() {
        let ok: ShareId = serde_json::from_str("\"9f86d081884c7d659a2feaa0c55ad015\"").unwrap();
        assert_eq!(ok.as_str(), "9f86d081884c7d659a2feaa0c55ad015");
        let short: ShareId = serde_json::from_str("\"0123456789abcdef\"").unwrap();
        assert_eq!(short.as_str(), "0123456789abcdef");
        assert!(serde_json::from_str::<ShareId>("\"nope\"").is_err());
        assert!(serde_json::from_str::<ShareId>("\"\"").is_err());
    }
}
