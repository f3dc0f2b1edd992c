//! vidsum video summarizer
//!
//! Command-line tool that cuts ordered time ranges out of a video and joins
//! them into a single summary file, samples still frames and converts between
//! avi, mov and mp4 containers.
//!
//! # Usage
//!
//! ```bash
//! vidsum summarize --input talk.mp4 --range 00:00:00,00:00:02 --range 00:00:05,00:00:07
//! vidsum summarize --input talk.mp4 --table ranges.csv --no-audio
//! vidsum extract --input talk.mp4 --fps 5
//! vidsum convert --input talk.mp4 --format avi
//! vidsum inspect --input talk.mp4 --format json
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use vidsum_cli::adapters::TomlConfigAdapter;
use vidsum_cli::app::DefaultAppContainer;
use vidsum_cli::cli::{commands, Cli};
use vidsum_cli::config_initialization::initialize_configuration_hierarchy;
use vidsum_cli::utils::logging::LoggingConfig;
use vidsum_cli::DomainError;

/// Exit status for rejected input, as opposed to media or filesystem failures
const EXIT_INPUT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            let input_error = e
                .chain()
                .filter_map(|cause| cause.downcast_ref::<DomainError>())
                .any(DomainError::is_input_error);
            if input_error {
                ExitCode::from(EXIT_INPUT_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = initialize_configuration_hierarchy(&cli)?;
    LoggingConfig::new(config.log_level, config.log_format).initialize();
    info!("Starting vidsum {}", env!("CARGO_PKG_VERSION"));
    match TomlConfigAdapter::serialize_config(&config) {
        Ok(resolved) => debug!("Resolved configuration:\n{}", resolved),
        Err(e) => warn!("Cannot render resolved configuration: {}", e),
    }

    let container = DefaultAppContainer::new(&config).context("Failed to initialize media backend")?;
    commands::run(cli, &container, &config).await?;

    info!("vidsum completed successfully");
    Ok(())
}
