use crate::core::{BatchSource, BlobStore, CleanupStatus, ConfigProvider, Outcome};
use crate::domain::model::{ProjectedRecord, RawRecord};
use crate::utils::error::{RelayError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Executes the read → decode → project → serialize → deliver → cleanup
/// sequence for one invocation. Holds no mutable state, so concurrent
/// invocations over different source objects need no coordination.
pub struct RelayPipeline<S: BlobStore, C: ConfigProvider> {
    store: S,
    config: C,
    client: Client,
}

impl<S: BlobStore, C: ConfigProvider> RelayPipeline<S, C> {
    pub fn new(store: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms()))
            .timeout(Duration::from_millis(config.read_timeout_ms()))
            .build()?;

        Ok(Self {
            store,
            config,
            client,
        })
    }

    /// Runs the whole sequence, converting every failure into a terminal
    /// outcome. Nothing escapes the invocation boundary.
    pub async fn process<Src: BatchSource>(&self, source: &Src) -> Outcome {
        tracing::info!("Processing source object: {}", source.name());

        match self.run(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Processing {} failed: {}", source.name(), e);
                Outcome::Failed(e)
            }
        }
    }

    async fn run<Src: BatchSource>(&self, source: &Src) -> Result<Outcome> {
        let bytes = source.fetch().await?;
        if bytes.is_empty() {
            tracing::info!("Source object is empty, execution skipped");
            return Ok(Outcome::Skipped);
        }

        let text = String::from_utf8(bytes).map_err(|e| RelayError::DecodeError {
            message: format!("Source object is not valid UTF-8: {}", e),
        })?;
        if text.trim().is_empty() {
            tracing::info!("Source object is blank, execution skipped");
            return Ok(Outcome::Skipped);
        }

        let batch = decode(&text)?;
        if batch.is_empty() {
            tracing::info!("Source object holds an empty batch, execution skipped");
            return Ok(Outcome::Skipped);
        }

        let projected = project(batch);
        let body = serde_json::to_string(&projected)?;

        self.deliver(body).await?;

        let cleanup = self.cleanup(source.name()).await;
        tracing::info!(
            "Delivered {} records from {}, cleanup: {:?}",
            projected.len(),
            source.name(),
            cleanup
        );

        Ok(Outcome::Delivered {
            records: projected.len(),
            cleanup,
        })
    }

    /// One POST, no retry. Any status below 400 (redirects included) counts
    /// as accepted by the sink.
    async fn deliver(&self, body: String) -> Result<()> {
        tracing::debug!("Posting batch to {}", self.config.endpoint());

        let response = self
            .client
            .post(self.config.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Sink response status: {}", status);

        if status.as_u16() >= 400 {
            return Err(RelayError::DeliveryError {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    /// Only runs after a successful delivery. An already-absent blob is an
    /// idempotent no-op; a failed delete is logged but never rolls back the
    /// delivery, which already happened.
    async fn cleanup(&self, name: &str) -> CleanupStatus {
        match self.store.exists(name).await {
            Ok(true) => match self.store.delete(name).await {
                Ok(()) => {
                    tracing::info!("Source object {} deleted", name);
                    CleanupStatus::Deleted
                }
                Err(e) => {
                    tracing::warn!("Failed to delete source object {}: {}", name, e);
                    CleanupStatus::Failed(e.to_string())
                }
            },
            Ok(false) => {
                tracing::warn!("Source object {} not found, skipping delete", name);
                CleanupStatus::AlreadyGone
            }
            Err(e) => {
                tracing::warn!("Existence check for {} failed: {}", name, e);
                CleanupStatus::Failed(e.to_string())
            }
        }
    }
}

/// Parses the batch as a JSON array of objects. Anything else is a terminal
/// decode failure for the invocation.
fn decode(text: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(text).map_err(|e| RelayError::DecodeError {
        message: format!("Source object is not a JSON array of objects: {}", e),
    })
}

/// Order-preserving, 1:1 field projection. Never fails: missing keys
/// propagate as null.
fn project(batch: Vec<RawRecord>) -> Vec<ProjectedRecord> {
    batch.iter().map(ProjectedRecord::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::{BlobSource, HttpSource, InlineSource};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStore {
        blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                blobs: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, name: &str, data: &[u8]) {
            let mut blobs = self.blobs.lock().await;
            blobs.insert(name.to_string(), data.to_vec());
        }

        async fn contains(&self, name: &str) -> bool {
            let blobs = self.blobs.lock().await;
            blobs.contains_key(name)
        }
    }

    impl BlobStore for MockStore {
        async fn exists(&self, name: &str) -> Result<bool> {
            let blobs = self.blobs.lock().await;
            Ok(blobs.contains_key(name))
        }

        async fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
            let blobs = self.blobs.lock().await;
            blobs
                .get(name)
                .cloned()
                .ok_or_else(|| RelayError::StorageError {
                    message: format!("Blob not found: {}", name),
                })
        }

        async fn delete(&self, name: &str) -> Result<()> {
            let mut blobs = self.blobs.lock().await;
            blobs
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| RelayError::StorageError {
                    message: format!("Blob not found: {}", name),
                })
        }
    }

    /// Store whose deletes always fail, for the cleanup-failure path.
    struct BrokenDeleteStore;

    impl BlobStore for BrokenDeleteStore {
        async fn exists(&self, _name: &str) -> Result<bool> {
            Ok(true)
        }

        async fn read_bytes(&self, _name: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        async fn delete(&self, name: &str) -> Result<()> {
            Err(RelayError::StorageError {
                message: format!("Delete rejected for {}", name),
            })
        }
    }

    struct TestConfig {
        endpoint: String,
    }

    impl TestConfig {
        fn new(endpoint: String) -> Self {
            Self { endpoint }
        }
    }

    impl ConfigProvider for TestConfig {
        fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn connect_timeout_ms(&self) -> u64 {
            5000
        }

        fn read_timeout_ms(&self) -> u64 {
            5000
        }
    }

    fn sample_batch() -> serde_json::Value {
        json!([
            {"orderId": 1, "customerId": 2, "totalAmount": 9.5, "status": "OPEN", "extra": "x"}
        ])
    }

    fn projected_batch() -> serde_json::Value {
        json!([
            {"orderId": 1, "customerId": 2, "totalAmount": 9.5, "status": "OPEN"}
        ])
    }

    #[tokio::test]
    async fn test_process_delivers_and_deletes_blob() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .json_body(projected_batch());
            then.status(200);
        });

        let store = MockStore::new();
        store
            .put("orders.json", sample_batch().to_string().as_bytes())
            .await;

        let pipeline =
            RelayPipeline::new(store.clone(), TestConfig::new(server.url("/hook"))).unwrap();
        let source = BlobSource::new("orders.json", store.clone());

        let outcome = pipeline.process(&source).await;

        sink.assert();
        match outcome {
            Outcome::Delivered { records, cleanup } => {
                assert_eq!(records, 1);
                assert_eq!(cleanup, CleanupStatus::Deleted);
            }
            other => panic!("Expected Delivered, got {:?}", other),
        }
        assert!(!store.contains("orders.json").await);
    }

    #[tokio::test]
    async fn test_process_preserves_record_order() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook").json_body(json!([
                {"orderId": 1, "customerId": null, "totalAmount": null, "status": null},
                {"orderId": 2, "customerId": null, "totalAmount": null, "status": null},
                {"orderId": 3, "customerId": null, "totalAmount": null, "status": null}
            ]));
            then.status(200);
        });

        let store = MockStore::new();
        let body = json!([{"orderId": 1}, {"orderId": 2}, {"orderId": 3}]);
        let source = InlineSource::new("batch.json", body.to_string().into_bytes());
        store.put("batch.json", b"{}").await;

        let pipeline =
            RelayPipeline::new(store.clone(), TestConfig::new(server.url("/hook"))).unwrap();

        let outcome = pipeline.process(&source).await;

        sink.assert();
        match outcome {
            Outcome::Delivered { records, .. } => assert_eq!(records, 3),
            other => panic!("Expected Delivered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_skips_empty_bytes() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        });

        let store = MockStore::new();
        store.put("orders.json", b"").await;

        let pipeline =
            RelayPipeline::new(store.clone(), TestConfig::new(server.url("/hook"))).unwrap();
        let source = BlobSource::new("orders.json", store.clone());

        let outcome = pipeline.process(&source).await;

        assert!(matches!(outcome, Outcome::Skipped));
        sink.assert_hits(0);
        assert!(store.contains("orders.json").await);
    }

    #[tokio::test]
    async fn test_process_skips_blank_text() {
        let store = MockStore::new();
        let pipeline = RelayPipeline::new(
            store,
            TestConfig::new("http://localhost:9/hook".to_string()),
        )
        .unwrap();
        let source = InlineSource::new("orders.json", b"  \n ".to_vec());

        let outcome = pipeline.process(&source).await;

        assert!(matches!(outcome, Outcome::Skipped));
    }

    #[tokio::test]
    async fn test_process_skips_empty_array() {
        let store = MockStore::new();
        let pipeline = RelayPipeline::new(
            store,
            TestConfig::new("http://localhost:9/hook".to_string()),
        )
        .unwrap();
        let source = InlineSource::new("orders.json", b"[]".to_vec());

        let outcome = pipeline.process(&source).await;

        assert!(matches!(outcome, Outcome::Skipped));
    }

    #[tokio::test]
    async fn test_process_fails_on_malformed_json() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        });

        let store = MockStore::new();
        store.put("orders.json", b"{not json").await;

        let pipeline =
            RelayPipeline::new(store.clone(), TestConfig::new(server.url("/hook"))).unwrap();
        let source = BlobSource::new("orders.json", store.clone());

        let outcome = pipeline.process(&source).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(RelayError::DecodeError { .. })
        ));
        sink.assert_hits(0);
        assert!(store.contains("orders.json").await);
    }

    #[tokio::test]
    async fn test_process_fails_on_non_array_json() {
        let store = MockStore::new();
        let pipeline = RelayPipeline::new(
            store,
            TestConfig::new("http://localhost:9/hook".to_string()),
        )
        .unwrap();
        let source = InlineSource::new("orders.json", br#"{"orderId": 1}"#.to_vec());

        let outcome = pipeline.process(&source).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(RelayError::DecodeError { .. })
        ));
    }

    #[tokio::test]
    async fn test_process_fails_on_invalid_utf8() {
        let store = MockStore::new();
        let pipeline = RelayPipeline::new(
            store,
            TestConfig::new("http://localhost:9/hook".to_string()),
        )
        .unwrap();
        let source = InlineSource::new("orders.json", vec![0xff, 0xfe, 0x01]);

        let outcome = pipeline.process(&source).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(RelayError::DecodeError { .. })
        ));
    }

    #[tokio::test]
    async fn test_process_rejected_delivery_keeps_blob() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(503);
        });

        let store = MockStore::new();
        store
            .put("orders.json", sample_batch().to_string().as_bytes())
            .await;

        let pipeline =
            RelayPipeline::new(store.clone(), TestConfig::new(server.url("/hook"))).unwrap();
        let source = BlobSource::new("orders.json", store.clone());

        let outcome = pipeline.process(&source).await;

        sink.assert();
        assert!(matches!(
            outcome,
            Outcome::Failed(RelayError::DeliveryError { status: 503 })
        ));
        assert!(store.contains("orders.json").await);
    }

    #[tokio::test]
    async fn test_process_cleanup_is_idempotent_when_blob_already_gone() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        });

        // The inline payload was captured by the trigger; the blob itself has
        // already been removed by the time cleanup runs.
        let store = MockStore::new();
        let pipeline =
            RelayPipeline::new(store, TestConfig::new(server.url("/hook"))).unwrap();
        let source =
            InlineSource::new("orders.json", sample_batch().to_string().into_bytes());

        let outcome = pipeline.process(&source).await;

        sink.assert();
        match outcome {
            Outcome::Delivered { records, cleanup } => {
                assert_eq!(records, 1);
                assert_eq!(cleanup, CleanupStatus::AlreadyGone);
            }
            other => panic!("Expected Delivered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_delete_failure_still_reports_delivered() {
        let server = MockServer::start();
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        });

        let pipeline =
            RelayPipeline::new(BrokenDeleteStore, TestConfig::new(server.url("/hook"))).unwrap();
        let source =
            InlineSource::new("orders.json", sample_batch().to_string().into_bytes());

        let outcome = pipeline.process(&source).await;

        sink.assert();
        match outcome {
            Outcome::Delivered { cleanup, .. } => {
                assert!(matches!(cleanup, CleanupStatus::Failed(_)));
            }
            other => panic!("Expected Delivered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_with_http_source() {
        let server = MockServer::start();
        let download = server.mock(|when, then| {
            when.method(GET).path("/blob/orders.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(sample_batch());
        });
        let sink = server.mock(|when, then| {
            when.method(POST).path("/hook").json_body(projected_batch());
            then.status(200);
        });

        let store = MockStore::new();
        let pipeline =
            RelayPipeline::new(store, TestConfig::new(server.url("/hook"))).unwrap();
        let source = HttpSource::new("orders.json", server.url("/blob/orders.json"));

        let outcome = pipeline.process(&source).await;

        download.assert();
        sink.assert();
        assert!(matches!(outcome, Outcome::Delivered { records: 1, .. }));
    }

    #[tokio::test]
    async fn test_process_fails_when_blob_source_is_missing() {
        let store = MockStore::new();
        let pipeline = RelayPipeline::new(
            store.clone(),
            TestConfig::new("http://localhost:9/hook".to_string()),
        )
        .unwrap();
        let source = BlobSource::new("missing.json", store);

        let outcome = pipeline.process(&source).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(RelayError::StorageError { .. })
        ));
    }

    #[test]
    fn test_decode_requires_array_of_objects() {
        assert!(decode(r#"[{"orderId": 1}]"#).is_ok());
        assert!(decode(r#"[1, 2, 3]"#).is_err());
        assert!(decode(r#""just a string""#).is_err());
    }

    #[test]
    fn test_project_preserves_count_and_order() {
        let batch: Vec<RawRecord> =
            serde_json::from_value(json!([{"orderId": 1}, {"orderId": 2}, {"orderId": 3}]))
                .unwrap();

        let projected = project(batch);

        assert_eq!(projected.len(), 3);
        assert_eq!(projected[0].order_id, json!(1));
        assert_eq!(projected[1].order_id, json!(2));
        assert_eq!(projected[2].order_id, json!(3));
    }
}
