use crate::utils::error::Result;
use async_trait::async_trait;

/// Key-value blob container. Implementations are bound to one container
/// (a directory, an S3 bucket) and address blobs by name only.
pub trait BlobStore: Send + Sync {
    fn exists(&self, name: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_bytes(&self, name: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn delete(&self, name: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// How one invocation obtains the batch bytes. The three trigger surfaces
/// differ only in this acquisition step, so each gets its own implementation
/// (inline payload, HTTP download, store read) and the pipeline stays single.
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Blob name used for cleanup after a successful delivery.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn connect_timeout_ms(&self) -> u64;
    fn read_timeout_ms(&self) -> u64;
}
