//! Token persistence.
//!
//! The session token survives restarts in a small JSON file
//! (`{"token": "..."}`). Tests and embedders can swap in
//! [`MemoryTokenStorage`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{ClientError, Result};

/// Where the session token lives between runs.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("Failed to read {}: {}", self.path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let session: PersistedSession = serde_json::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("Corrupt session file {}: {}", self.path.display(), e)))?;

        Ok(Some(session.token).filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(&PersistedSession {
            token: token.to_string(),
        })?;
        std::fs::write(&self.path, content)
            .map_err(|e| ClientError::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }

    fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-process storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested/session.json"));

        assert_eq!(storage.load().unwrap(), None);
        storage.save("abc.def").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc.def"));

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // removing twice is fine
        storage.remove().unwrap();
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileTokenStorage::new(&path);
        assert!(matches!(storage.load(), Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryTokenStorage::with_token("t");
        assert_eq!(storage.load().unwrap().as_deref(), Some("t"));
        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
