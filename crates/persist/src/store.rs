//! Key-value stores behind the persistence adapter.
//!
//! File layout inside a `FileStore` directory:
//! ```text
//! <key>.json   - envelope { schema_version, sha256, payload }
//! ```
//! The payload is the caller's string verbatim; the envelope only adds a
//! schema version and a SHA-256 of the payload so a damaged file reads as an
//! error instead of as garbage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current envelope schema version.
const ENVELOPE_SCHEMA_VERSION: u32 = 1;

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed for '{key}': expected {expected}, got {actual}")]
    IntegrityMismatch {
        key: String,
        expected: String,
        actual: String,
    },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Storage for small string records. The core owns serialization and
/// validation; adapters only move strings.
pub trait PersistenceAdapter {
    /// Stored value, or `None` if nothing was ever stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Remove a record. Returns whether one existed.
    fn remove(&mut self, key: &str) -> Result<bool, PersistError>;
}

/// In-memory store, for tests and sessions that should not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PersistError> {
        Ok(self.records.remove(key).is_some())
    }
}

/// On-disk record wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub schema_version: u32,
    pub sha256: String,
    pub payload: String,
}

impl Envelope {
    pub fn seal(payload: &str) -> Self {
        Self {
            schema_version: ENVELOPE_SCHEMA_VERSION,
            sha256: sha256_hex(payload.as_bytes()),
            payload: payload.to_string(),
        }
    }

    /// Check schema and checksum, then hand back the payload.
    pub fn open(self, key: &str) -> Result<String, PersistError> {
        if self.schema_version != ENVELOPE_SCHEMA_VERSION {
            return Err(PersistError::SchemaMismatch {
                file_version: self.schema_version,
                expected_version: ENVELOPE_SCHEMA_VERSION,
            });
        }
        let actual = sha256_hex(self.payload.as_bytes());
        if actual != self.sha256 {
            return Err(PersistError::IntegrityMismatch {
                key: key.to_string(),
                expected: self.sha256,
                actual,
            });
        }
        Ok(self.payload)
    }
}

/// File-backed store: one checksummed JSON envelope per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open or create a store rooted at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl PersistenceAdapter for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        envelope.open(key).map(Some)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        serde_json::to_writer_pretty(std::fs::File::create(&tmp)?, &Envelope::seal(value))?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(key, path = %path.display(), "record written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PersistError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
