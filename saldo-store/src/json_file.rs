//! File-backed storage: one `<key>.json` per collection key, rewritten
//! whole on every save.

use saldo_core::{Storage, StorageError};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&mut self, key: &str, payload: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        log::debug!("write {}", path.display());
        fs::write(path, payload)?;
        Ok(())
    }
}
