//! Share registry persistence.
//!
//! A [`ShareStore`] loads and saves the whole record collection at once. It knows nothing about
//! expiry or idempotency; [`crate::shares::ShareRegistry`] layers atomic operations on top.

use crate::shares::ShareRecord;
use crate::{CoreError, CoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Whole-collection persistence for share records.
///
/// Implementations need not be safe against concurrent `load`/`save` pairs; callers serialise
/// access.
pub trait ShareStore: Send + Sync {
    /// Loads every record. A store that was never written is empty.
    fn load(&self) -> CoreResult<Vec<ShareRecord>>;

    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[ShareRecord]) -> CoreResult<()>;
}

/// A human-readable JSON array on disk, rewritten wholesale on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "shares.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ShareStore for JsonFileStore {
    fn load(&self) -> CoreResult<Vec<ShareRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::RegistryRead(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(CoreError::Deserialization)
    }

    fn save(&self, records: &[ShareRecord]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(CoreError::RegistryWrite)?;
        }

        let json = serde_json::to_string_pretty(records).map_err(CoreError::Serialization)?;

        // Write-then-rename so readers never observe a half-written registry.
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(CoreError::RegistryWrite)?;
        fs::rename(&temp, &self.path).map_err(CoreError::RegistryWrite)
    }
}

/// Volatile store for tests and tooling.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<ShareRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ShareRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl ShareStore for InMemoryStore {
    fn load(&self) -> CoreResult<Vec<ShareRecord>> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|_| CoreError::RegistryPoisoned)
    }

    fn save(&self, records: &[ShareRecord]) -> CoreResult<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| CoreError::RegistryPoisoned)?;
        *guard = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample(file_id: &str) -> ShareRecord {
        ShareRecord::new(file_id.into(), file_id.into(), None, Utc::now())
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("data").join("shares.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("shares.json");
        let store = JsonFileStore::new(&path);
        let records = vec![sample("a.txt"), sample("b.pdf")];

        store.save(&records).unwrap();

        assert!(path.is_file());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_saved_file_is_pretty_json_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shares.json");
        let store = JsonFileStore::new(&path);
        store.save(&[sample("a.txt")]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {"));
        assert!(contents.contains("\"fileId\": \"a.txt\""));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shares.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn test_loads_records_with_short_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shares.json");
        fs::write(
            &path,
            r#"[{"id":"0123456789abcdef","fileId":"a.txt","fileName":"a.txt",
                "createdAt":"2024-03-01T12:00:00Z","expiresAt":null,"downloads":2}]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(&path).load().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "0123456789abcdef");
        assert_eq!(records[0].downloads, 2);
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shares.json");
        fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_empty());
        let records = vec![sample("a.txt")];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }
}
