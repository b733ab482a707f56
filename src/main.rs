use clap::Parser;
use order_relay::utils::{logger, validation::Validate};
use order_relay::{
    BlobSource, CliConfig, HttpSource, LocalStorage, Outcome, RelayPipeline,
};
use std::time::Duration;

async fn run_once(
    pipeline: &RelayPipeline<LocalStorage, CliConfig>,
    config: &CliConfig,
    storage: &LocalStorage,
) -> Outcome {
    match &config.source_url {
        Some(url) => {
            pipeline
                .process(&HttpSource::new(&config.blob_name, url.clone()))
                .await
        }
        None => {
            pipeline
                .process(&BlobSource::new(&config.blob_name, storage.clone()))
                .await
        }
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting order-relay");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Configuration error: {}", e);
        std::process::exit(2);
    }

    let storage = LocalStorage::new(config.container.clone());
    let pipeline = match RelayPipeline::new(storage.clone(), config.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(2);
        }
    };

    match config.watch {
        Some(seconds) => {
            // Timer-style polling: failures are logged and the loop keeps
            // going, mirroring a scheduled trigger with no caller to answer.
            tracing::info!("Polling {} every {}s", config.blob_name, seconds);
            let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
            loop {
                ticker.tick().await;
                match run_once(&pipeline, &config, &storage).await {
                    Outcome::Delivered { records, .. } => {
                        tracing::info!("Delivered {} records", records);
                    }
                    Outcome::Skipped => {
                        tracing::info!("Nothing to deliver");
                    }
                    Outcome::Failed(e) => {
                        tracing::error!("Poll pass failed: {}", e);
                    }
                }
            }
        }
        None => match run_once(&pipeline, &config, &storage).await {
            Outcome::Delivered { records, cleanup } => {
                tracing::info!("Delivered {} records, cleanup: {:?}", records, cleanup);
                println!("Delivered {} records", records);
            }
            Outcome::Skipped => {
                tracing::info!("Nothing to deliver");
                println!("Nothing to deliver");
            }
            Outcome::Failed(e) => {
                tracing::error!("Processing failed: {}", e);
                eprintln!("Processing failed: {}", e);
                std::process::exit(1);
            }
        },
    }
}
