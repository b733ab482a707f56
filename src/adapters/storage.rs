use crate::domain::ports::BlobStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed container for local runs and tests. Blob names map to
/// file names under the base path.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        Path::new(&self.base_path).join(name)
    }
}

impl BlobStore for LocalStorage {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.blob_path(name).is_file())
    }

    async fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.blob_path(name))?;
        Ok(data)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        fs::remove_file(self.blob_path(name))?;
        Ok(())
    }
}
