// Adapters layer: concrete implementations for external systems (batch
// sources, storage backends).

pub mod source;
pub mod storage;

#[cfg(feature = "lambda")]
pub mod s3;
