/// Errors that can occur when creating a validated stored name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    /// The input was empty
    #[error("Stored name cannot be empty")]
    Empty,

    /// The input was `.` or `..`
    #[error("Stored name cannot be a relative directory reference: {0}")]
    DotSegment(String),

    /// The input contained a path separator or NUL byte
    #[error("Stored name contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),
}

/// A file name that is safe to use as a single path component inside the blob store.
///
/// A `StoredName` is never empty, is never `.` or `..`, and never contains `/`, `\` or NUL.
/// Joining it onto a directory therefore always yields a direct child of that directory.
///
/// Unlike upload name cleaning, construction does not rewrite anything: invalid input is
/// rejected so callers decide how to sanitise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoredName(String);

impl StoredName {
    /// Creates a new `StoredName` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for an empty string, [`NameError::DotSegment`] for `.` and
    /// `..`, and [`NameError::ForbiddenCharacter`] if a separator or NUL byte is present.
    pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(NameError::Empty);
        }
        if input == "." || input == ".." {
            return Err(NameError::DotSegment(input.to_owned()));
        }
        if let Some(c) = input.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(NameError::ForbiddenCharacter(c));
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the extension without its leading dot, if there is one.
    ///
    /// A leading dot (as in `.profile`) does not start an extension.
    pub fn extension(&self) -> Option<&str> {
        match self.0.rfind('.') {
            Some(idx) if idx > 0 => Some(&self.0[idx + 1..]),
            _ => None,
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StoredName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StoredName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for StoredName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl std::str::FromStr for StoredName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for StoredName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for StoredName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StoredName::new(&s).map_err(serde::de::Error::custom)
    }
}
