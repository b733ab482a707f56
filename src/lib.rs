pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::EnvConfig;

#[cfg(feature = "lambda")]
pub use adapters::s3::S3BlobStore;
pub use adapters::source::{BlobSource, HttpSource, InlineSource};
pub use adapters::storage::LocalStorage;

pub use core::pipeline::RelayPipeline;
pub use domain::model::{CleanupStatus, Outcome, ProjectedRecord, RawRecord};
pub use domain::ports::{BatchSource, BlobStore, ConfigProvider};
pub use utils::error::{RelayError, Result};
