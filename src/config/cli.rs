use crate::domain::ports::ConfigProvider;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "order-relay")]
#[command(about = "Projects order batches from blob storage and relays them to a webhook")]
pub struct CliConfig {
    /// Webhook endpoint receiving the projected batch
    #[arg(long)]
    pub endpoint: String,

    /// Directory acting as the blob container
    #[arg(long, default_value = "./container")]
    pub container: String,

    /// Name of the source object inside the container
    #[arg(long, default_value = "orders.json")]
    pub blob_name: String,

    /// Download the source object from this URL instead of the container
    #[arg(long)]
    pub source_url: Option<String>,

    #[arg(long, default_value = "5000")]
    pub connect_timeout_ms: u64,

    #[arg(long, default_value = "5000")]
    pub read_timeout_ms: u64,

    /// Re-run the pipeline every N seconds instead of exiting after one pass
    #[arg(long)]
    pub watch: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
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

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("container", &self.container)?;
        validation::validate_non_empty_string("blob_name", &self.blob_name)?;

        if let Some(url) = &self.source_url {
            validation::validate_url("source_url", url)?;
        }

        validation::validate_range("connect_timeout_ms", self.connect_timeout_ms, 1, 300_000)?;
        validation::validate_range("read_timeout_ms", self.read_timeout_ms, 1, 300_000)?;

        if let Some(interval) = self.watch {
            validation::validate_positive_number("watch", interval, 1)?;
        }

        Ok(())
    }
}
