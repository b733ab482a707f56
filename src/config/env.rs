use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use std::env;

const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Process-wide configuration for deployed functions, read once at startup.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub blob_name: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("POST_URL").map_err(|_| RelayError::MissingConfigError {
                field: "POST_URL".to_string(),
            })?,
            bucket: env::var("S3_BUCKET").map_err(|_| RelayError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            blob_name: env::var("BLOB_NAME").unwrap_or_else(|_| "orders.json".to_string()),
            connect_timeout_ms: timeout_from_env("CONNECT_TIMEOUT_MS"),
            read_timeout_ms: timeout_from_env("READ_TIMEOUT_MS"),
        })
    }
}

fn timeout_from_env(var: &str) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}

impl ConfigProvider for EnvConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
    }

    fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("bucket", &self.bucket)?;
        validation::validate_non_empty_string("region", &self.region)?;
        validation::validate_non_empty_string("blob_name", &self.blob_name)?;
        validation::validate_range("connect_timeout_ms", self.connect_timeout_ms, 1, 300_000)?;
        validation::validate_range("read_timeout_ms", self.read_timeout_ms, 1, 300_000)?;

        Ok(())
    }
}
