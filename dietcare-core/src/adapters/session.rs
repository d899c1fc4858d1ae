//! Session store adapters
//!
//! - `FileSessionStore`: `session.json` in the dietcare directory, replaced
//!   atomically (temp file + rename) under an advisory lock
//! - `MemorySessionStore`: process-local slot for tests and embedding

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::SessionStore;

const SESSION_FILE: &str = "session.json";
const LOCK_FILE: &str = ".session.lock";

/// Session persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dietcare_dir: &Path) -> Self {
        Self {
            dir: dietcare_dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Open the lock file; the lock is released when the handle drops
    fn lock(&self, exclusive: bool) -> Result<File> {
        std::fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(file)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let _guard = self.lock(false)?;
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        // Unreadable session data is treated as signed out
        Ok(serde_json::from_str(&content).ok())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let _guard = self.lock(true)?;
        let content = serde_json::to_string_pretty(session)?;

        write_atomically(&self.path(), &content)
            .map_err(|e| Error::Session(format!("Failed to persist session: {}", e)))
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock(true)?;
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Replace `path` with `content` through a temp file in the same directory
pub(crate) fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Session held in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let slot = self
            .slot
            .read()
            .map_err(|e| Error::Session(format!("Lock poisoned: {}", e)))?;
        Ok(slot.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| Error::Session(format!("Lock poisoned: {}", e)))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| Error::Session(format!("Lock poisoned: {}", e)))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, User};
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let mut session = Session::new(User::demo());
        session.profile = Some(Profile::new("1"));
        store.save(&session).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        store.save(&Session::new(User::demo())).unwrap();
        store.clear().unwrap();

        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_is_signed_out() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        std::fs::write(store.path(), "{\"user\": ").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("dietcare");
        let store = FileSessionStore::new(&nested);
        store.save(&Session::new(User::demo())).unwrap();
        assert!(nested.join("session.json").exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&Session::new(User::demo())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().user.id, "1");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
