pub mod pipeline;

pub use crate::domain::model::{CleanupStatus, Outcome, ProjectedRecord, RawRecord};
pub use crate::domain::ports::{BatchSource, BlobStore, ConfigProvider};
pub use crate::utils::error::Result;
