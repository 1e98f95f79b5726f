use super::KeyValueStore;
use crate::error::{BoardError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STORAGE_FILENAME: &str = "storage.json";

/// File-backed key-value store.
///
/// All entries live in a single JSON object at `<root>/storage.json`. Reads go
/// to disk every time, so entries changed by another handle (or removed by
/// hand) are seen immediately.
///
/// A `storage.json` that does not parse fails reads, but not writes: the next
/// `set` moves the bad file aside as `storage.<uuid>.corrupt` and starts a
/// fresh map.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn storage_path(&self) -> PathBuf {
        self.root.join(STORAGE_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BoardError::Io)?;
        }
        Ok(())
    }

    fn load_entries(&self) -> Result<BTreeMap<String, String>> {
        let path = self.storage_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).map_err(BoardError::Io)?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(BoardError::Serialization)?;
        Ok(entries)
    }

    /// Entries to write back to. A corrupt file is set aside, never merged.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>> {
        match self.load_entries() {
            Err(BoardError::Serialization(err)) => {
                let aside = self.root.join(format!("storage.{}.corrupt", Uuid::new_v4()));
                tracing::warn!(
                    %err,
                    aside = %aside.display(),
                    "storage file is corrupt, starting over"
                );
                fs::rename(self.storage_path(), &aside).map_err(BoardError::Io)?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(entries).map_err(BoardError::Serialization)?;

        let tmp_file = self.root.join(format!(".storage-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(BoardError::Io)?;
        fs::rename(&tmp_file, self.storage_path()).map_err(BoardError::Io)?;
        Ok(())
    }
}

impl KeyValueStore for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.load_entries()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save_entries(&entries)?;
        tracing::trace!(key, bytes = value.len(), "storage entry written");
        Ok(())
    }
}
