#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use order_relay::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use order_relay::{BlobSource, EnvConfig, Outcome, RelayPipeline, S3BlobStore};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    /// Overrides the configured source object name for this invocation.
    pub blob_name: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub records_processed: usize,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Trigger received a request to process the source object");

    let config = EnvConfig::from_env()?;
    config.validate()?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .region(Region::new(config.region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let blob_name = event
        .payload
        .blob_name
        .unwrap_or_else(|| config.blob_name.clone());
    let store = S3BlobStore::new(s3_client, config.bucket.clone());
    let source = BlobSource::new(blob_name, store.clone());

    let pipeline = RelayPipeline::new(store, config)?;

    // A failed invocation becomes a handler error so the platform answers
    // with a 500 carrying the error text.
    match pipeline.process(&source).await {
        Outcome::Delivered { records, .. } => Ok(Response {
            message: "Batch delivered and source object removed".to_string(),
            records_processed: records,
        }),
        Outcome::Skipped => Ok(Response {
            message: "Source object empty, nothing delivered".to_string(),
            records_processed: 0,
        }),
        Outcome::Failed(e) => Err(e.into()),
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
