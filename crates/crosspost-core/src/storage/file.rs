//! File-backed key-value store.
//!
//! One file per key under a data directory, written atomically via a temp
//! file and rename so a crash mid-write never leaves a truncated value.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::KeyValueStore;
use crate::error::{RelayError, RelayResult};

const DATA_DIR: &str = ".crosspost";

/// File-per-key store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the default data directory
    /// (`~/.crosspost`), creating it if needed.
    pub fn new() -> RelayResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| RelayError::Store("Cannot get home directory".to_string()))?;
        Self::at(home.join(DATA_DIR))
    }

    /// Create a store rooted at an explicit directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> RelayResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> RelayResult<PathBuf> {
        // Keys are caller-controlled strings; refuse anything that could
        // escape the data directory.
        if key.is_empty()
            || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            || key.contains("..")
        {
            return Err(RelayError::Store(format!("Invalid store key: {key}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> RelayResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> RelayResult<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> RelayResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
