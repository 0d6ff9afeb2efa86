//! Device-local identity store
//!
//! Persisted key/value state shared between the responder (reader of the
//! account id) and the application layer (writer of the account id and the
//! protection deadline). Each entry has a single logical writer, so no
//! cross-process locking is required; a stale read simply means an older
//! identity is announced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors raised by identity store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying persistence failed
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Persisted state could not be decoded
    #[error("corrupt store contents: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value store holding the device's ledger identity and protection
/// state.
///
/// The protection deadline is persisted and clearable from the application
/// layer but is not consulted by the responder's reply path; read-side
/// enforcement is an explicit policy seam, not implemented here.
pub trait IdentityStore: Send + Sync {
    /// Current account identifier; empty string when unset
    fn account_id(&self) -> Result<String, StoreError>;

    /// Set the account identifier announced on the next tap
    fn set_account_id(&self, id: &str) -> Result<(), StoreError>;

    /// Protection deadline as unix milliseconds; 0 when unset or cleared
    fn protection_deadline(&self) -> Result<u64, StoreError>;

    /// Set the protection deadline (unix milliseconds)
    fn set_protection_deadline(&self, unix_millis: u64) -> Result<(), StoreError>;

    /// Reset the protection deadline to the epoch
    fn clear_protection(&self) -> Result<(), StoreError> {
        self.set_protection_deadline(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(rename = "accountId", default)]
    account_id: String,
    #[serde(rename = "protectedUntil", default)]
    protected_until: u64,
}

/// In-memory store for tests and ephemeral embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    prefs: Mutex<Prefs>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with an account id
    pub fn with_account_id(id: impl Into<String>) -> Self {
        let store = Self::new();
        store.prefs.lock().account_id = id.into();
        store
    }
}

impl IdentityStore for MemoryStore {
    fn account_id(&self) -> Result<String, StoreError> {
        Ok(self.prefs.lock().account_id.clone())
    }

    fn set_account_id(&self, id: &str) -> Result<(), StoreError> {
        self.prefs.lock().account_id = id.to_string();
        Ok(())
    }

    fn protection_deadline(&self) -> Result<u64, StoreError> {
        Ok(self.prefs.lock().protected_until)
    }

    fn set_protection_deadline(&self, unix_millis: u64) -> Result<(), StoreError> {
        self.prefs.lock().protected_until = unix_millis;
        Ok(())
    }
}

/// JSON-file-backed store, the on-device persistence of the shipped app.
///
/// The whole preference blob is rewritten on every set; a missing file
/// reads as defaults (empty account id, no protection).
#[derive(Debug)]
pub struct PrefsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl PrefsStore {
    /// Open a store at the given path; the file is created lazily on the
    /// first write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Prefs, StoreError> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Prefs::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, prefs: &Prefs) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(prefs)?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "persisted identity prefs");
        Ok(())
    }
}

impl IdentityStore for PrefsStore {
    fn account_id(&self) -> Result<String, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.account_id)
    }

    fn set_account_id(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut prefs = self.load()?;
        prefs.account_id = id.to_string();
        self.save(&prefs)
    }

    fn protection_deadline(&self) -> Result<u64, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.protected_until)
    }

    fn set_protection_deadline(&self, unix_millis: u64) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut prefs = self.load()?;
        prefs.protected_until = unix_millis;
        self.save(&prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.account_id().unwrap(), "");
        assert_eq!(store.protection_deadline().unwrap(), 0);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set_account_id("acct-42").unwrap();
        assert_eq!(store.account_id().unwrap(), "acct-42");

        store.set_protection_deadline(1_700_000_000_000).unwrap();
        assert_eq!(store.protection_deadline().unwrap(), 1_700_000_000_000);
        store.clear_protection().unwrap();
        assert_eq!(store.protection_deadline().unwrap(), 0);
    }

    #[test]
    fn prefs_store_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::open(dir.path().join("prefs.json"));
        assert_eq!(store.account_id().unwrap(), "");
        assert_eq!(store.protection_deadline().unwrap(), 0);
    }

    #[test]
    fn prefs_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = PrefsStore::open(&path);
        store.set_account_id("acct-7").unwrap();
        store.set_protection_deadline(123).unwrap();

        let reopened = PrefsStore::open(&path);
        assert_eq!(reopened.account_id().unwrap(), "acct-7");
        assert_eq!(reopened.protection_deadline().unwrap(), 123);

        reopened.clear_protection().unwrap();
        assert_eq!(PrefsStore::open(&path).protection_deadline().unwrap(), 0);
    }

    #[test]
    fn prefs_store_rejects_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"not-json").unwrap();

        let store = PrefsStore::open(&path);
        assert!(matches!(store.account_id(), Err(StoreError::Corrupt(_))));
    }
}
