//! Key-value persistence for session state.
//!
//! The browser original kept the token and user record in local storage.
//! Here the same two-entry layout sits behind [`KeyValueStorage`] so any
//! backend can stand in: a JSON file on disk for real use, a hash map for
//! tests and non-persistent embedders.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

const STORAGE_SCHEMA_VERSION: u32 = 1;

/// Durable string-keyed storage with local-storage semantics.
///
/// Operations are infallible at this boundary; backends absorb and log their
/// own I/O failures rather than surfacing them to session logic.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// On-disk format for a storage file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageFile {
    schema: u32,
    #[serde(default)]
    entries: HashMap<String, String>,
}

impl Default for StorageFile {
    fn default() -> Self {
        Self {
            schema: STORAGE_SCHEMA_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// JSON-file-backed storage with an in-memory write-through cache.
///
/// Load is lenient: a missing or unparseable file starts empty rather than
/// failing, matching how the browser treated corrupt local storage.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: Mutex<StorageFile>,
}

impl FileStorage {
    /// Opens (or initializes) storage at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    /// Default per-user storage location (`~/.config/tutorhub/session.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("tutorhub").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, file: &StorageFile) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(file)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            fs::write(&self.path, json)
        })();
        if let Err(err) = result {
            warn!(
                target = "tutorhub.storage",
                path = %self.path.display(),
                error = %err,
                "failed to persist storage file"
            );
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.file.lock().entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut file = self.file.lock();
        file.entries.insert(key.to_string(), value.to_string());
        self.save(&file);
    }

    fn remove(&self, key: &str) {
        let mut file = self.file.lock();
        if file.entries.remove(key).is_some() {
            self.save(&file);
        }
    }

    fn clear(&self) {
        let mut file = self.file.lock();
        file.entries.clear();
        self.save(&file);
    }
}
