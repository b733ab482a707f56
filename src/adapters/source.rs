use crate::domain::ports::{BatchSource, BlobStore};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Batch bytes handed over by the trigger itself (blob-created events ship
/// the object content in the payload).
pub struct InlineSource {
    name: String,
    bytes: Vec<u8>,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl BatchSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Direct download of the blob over HTTP (pre-signed or public URL).
pub struct HttpSource {
    name: String,
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl BatchSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Downloading source object from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::StorageError {
                message: format!("Download of {} failed with HTTP status {}", self.url, status),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Store-backed read (timer poll and anything else that addresses the blob
/// by name). A missing blob is a fetch error, not a skip.
pub struct BlobSource<S: BlobStore> {
    name: String,
    store: S,
}

impl<S: BlobStore> BlobSource<S> {
    pub fn new(name: impl Into<String>, store: S) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }
}

#[async_trait]
impl<S: BlobStore> BatchSource for BlobSource<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        if !self.store.exists(&self.name).await? {
            return Err(RelayError::StorageError {
                message: format!("Blob not found: {}", self.name),
            });
        }

        self.store.read_bytes(&self.name).await
    }
}
