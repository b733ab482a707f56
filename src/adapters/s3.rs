use crate::domain::ports::BlobStore;
use crate::utils::error::{RelayError, Result};
use aws_sdk_s3::Client as S3Client;

/// S3-backed container for deployed functions. The bucket plays the role of
/// the container; blob names map to object keys.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl BlobStore for S3BlobStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(RelayError::StorageError {
                        message: format!("Existence check for {} failed: {}", name, service_err),
                    })
                }
            }
        }
    }

    async fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| RelayError::StorageError {
                message: format!("Failed to read {} from S3: {}", name, e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| RelayError::StorageError {
                message: format!("Failed to collect S3 body for {}: {}", name, e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| RelayError::StorageError {
                message: format!("Failed to delete {} from S3: {}", name, e),
            })?;

        Ok(())
    }
}
