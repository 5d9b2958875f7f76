//! JSON file key-value store
//!
//! The whole store is one JSON object of string values. Every write is a
//! read-modify-write under an exclusive lock on a sibling `.lock` file, and
//! the new content replaces the old through a rename. A file that no longer
//! parses is moved aside to `<name>.corrupt` and the store starts empty.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            lock_path: sibling(path, ".lock"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    /// Path unreadable store files are moved to
    pub fn corrupt_path(&self) -> PathBuf {
        sibling(&self.path, ".corrupt")
    }

    /// Current entries; callers hold the lock
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = self.corrupt_path();
                eprintln!(
                    "[pocketbook] {} is not a valid store file ({}); moved to {}",
                    self.path.display(),
                    e,
                    aside.display()
                );
                fs::rename(&self.path, &aside)?;
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let tmp_path = sibling(&self.path, ".tmp");

        fs::write(&tmp_path, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let lock = self.lock()?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        let written = self.write_all(&entries);
        lock.unlock()?;
        written
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.lock()?;
        let value = self.read_all()?.remove(key);
        lock.unlock()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        let lock = self.lock()?;
        let keys = self.read_all()?.into_keys().collect();
        lock.unlock()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pocketbook.json");

        {
            let store = JsonFileStore::new(&path).unwrap();
            store.set("theme", "\"dark\"").unwrap();
            store.set("users", "[]").unwrap();
            store.remove("users").unwrap();
        }

        let store = JsonFileStore::new(&path).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(store.get("users").unwrap(), None);
        assert_eq!(store.keys().unwrap(), vec!["theme".to_string()]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(&dir.path().join("nested/store.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_file_is_moved_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"users": "[]", trunc"#).unwrap();

        let store = JsonFileStore::new(&path).unwrap();
        assert_eq!(store.get("users").unwrap(), None);
        assert!(!path.exists());
        assert_eq!(
            std::fs::read_to_string(store.corrupt_path()).unwrap(),
            r#"{"users": "[]", trunc"#
        );

        store.set("theme", "\"light\"").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["theme".to_string()]);
    }
}
