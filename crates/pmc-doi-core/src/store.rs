//! PMC → DOI mapping store
//!
//! Records live one per file under a root directory, named after the
//! canonical PMC id (`PMC2910419.json`). The store is read-only.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::identifier::PmcId;

/// A single mapping record as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoiRecord {
    #[serde(rename = "PMC", default)]
    pub pmc: Option<String>,
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
}

impl DoiRecord {
    pub fn new(pmc: impl Into<String>, doi: Option<&str>) -> Self {
        Self {
            pmc: Some(pmc.into()),
            doi: doi.map(str::to_string),
        }
    }

    /// Stored PMC id, falling back to the id used for the lookup
    pub fn pmc_or(&self, id: &PmcId) -> String {
        self.pmc.clone().unwrap_or_else(|| id.to_string())
    }

    /// The DOI, if the record carries a non-blank one
    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

/// Read access to PMC → DOI records
pub trait DoiStore: Send + Sync {
    /// Look up the record for a canonical id. Absence and read failures both
    /// come back as `None`.
    fn lookup(&self, id: &PmcId) -> Option<DoiRecord>;
}

/// Directory of JSON record files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, id: &PmcId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Lookup that keeps read and parse failures distinct from absence
    pub fn try_lookup(&self, id: &PmcId) -> Result<Option<DoiRecord>, StoreError> {
        // Ids that could escape the root are never valid record names
        if id.as_str().contains(['/', '\\']) || id.as_str().contains("..") {
            return Ok(None);
        }

        let path = self.record_path(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

impl DoiStore for FileStore {
    fn lookup(&self, id: &PmcId) -> Option<DoiRecord> {
        match self.try_lookup(id) {
            Ok(record) => {
                if record.is_none() {
                    tracing::debug!("No record for {}", id);
                }
                record
            }
            Err(e) => {
                tracing::error!("Loading DOI for {}: {}", id, e);
                None
            }
        }
    }
}

/// In-memory store, keyed by canonical id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, DoiRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. The key is normalized before storing.
    pub fn insert(&mut self, id: &str, record: DoiRecord) {
        self.records
            .insert(PmcId::normalize(id).into_string(), record);
    }

    pub fn with_record(mut self, id: &str, doi: Option<&str>) -> Self {
        let key = PmcId::normalize(id);
        let record = DoiRecord::new(key.as_str(), doi);
        self.records.insert(key.into_string(), record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DoiStore for MemoryStore {
    fn lookup(&self, id: &PmcId) -> Option<DoiRecord> {
        self.records.get(id.as_str()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_record(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_file_store_found() {
        let dir = TempDir::new().unwrap();
        write_record(
            &dir,
            "PMC2910419.json",
            r#"{"PMC": "PMC2910419", "DOI": "10.1186/1471-2164-11-425"}"#,
        );
        let store = FileStore::new(dir.path());

        let record = store.lookup(&PmcId::normalize("2910419")).unwrap();
        assert_eq!(record.doi(), Some("10.1186/1471-2164-11-425"));
        assert_eq!(record.pmc.as_deref(), Some("PMC2910419"));
    }

    #[test]
    fn test_file_store_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.lookup(&PmcId::normalize("PMC999999999")).is_none());
        assert!(store
            .try_lookup(&PmcId::normalize("PMC999999999"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_file_store_corrupt_record_is_none() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "PMC1.json", "{not json");
        let store = FileStore::new(dir.path());
        let id = PmcId::normalize("1");

        assert!(matches!(
            store.try_lookup(&id),
            Err(StoreError::Parse { .. })
        ));
        assert!(store.lookup(&id).is_none());
    }

    #[test]
    fn test_file_store_unreadable_path_is_none() {
        let dir = TempDir::new().unwrap();
        // A directory where the record file should be fails with a non-NotFound error
        std::fs::create_dir(dir.path().join("PMC7.json")).unwrap();
        let store = FileStore::new(dir.path());
        let id = PmcId::normalize("PMC7");

        assert!(matches!(store.try_lookup(&id), Err(StoreError::Io { .. })));
        assert!(store.lookup(&id).is_none());
    }

    #[test]
    fn test_file_store_rejects_path_escape() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("doi"));
        std::fs::create_dir(dir.path().join("doi")).unwrap();
        write_record(&dir, "SECRET.json", r#"{"DOI": "10.1/leak"}"#);

        let id = PmcId::normalize("PMC/../../SECRET");
        assert!(store.try_lookup(&id).unwrap().is_none());
    }

    #[test]
    fn test_record_without_doi() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "PMC2897429.json", r#"{"PMC": "PMC2897429", "DOI": null}"#);
        let store = FileStore::new(dir.path());

        let record = store.lookup(&PmcId::normalize("pmc2897429")).unwrap();
        assert_eq!(record.doi(), None);
    }

    #[test]
    fn test_record_extra_fields_ignored() {
        let record: DoiRecord =
            serde_json::from_str(r#"{"DOI": "10.1/x", "title": "ignored"}"#).unwrap();
        assert_eq!(record.doi(), Some("10.1/x"));
        assert_eq!(record.pmc_or(&PmcId::normalize("5")), "PMC5");
    }

    #[test]
    fn test_blank_doi_treated_as_missing() {
        let record = DoiRecord::new("PMC1", Some("  "));
        assert_eq!(record.doi(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new()
            .with_record("PMC2910419", Some("10.1186/1471-2164-11-425"))
            .with_record("2897429", None);

        assert_eq!(store.len(), 2);
        assert!(store.lookup(&PmcId::normalize("2910419")).is_some());
        assert!(store
            .lookup(&PmcId::normalize("PMC2897429"))
            .unwrap()
            .doi()
            .is_none());
        assert!(store.lookup(&PmcId::normalize("PMC1")).is_none());
    }

    #[test]
    fn test_memory_store_insert_normalizes_key() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.insert(" pmc42 ", DoiRecord::new("PMC42", Some("10.1/42")));

        let record = store.lookup(&PmcId::normalize("42")).unwrap();
        assert_eq!(record.doi(), Some("10.1/42"));
    }
}
