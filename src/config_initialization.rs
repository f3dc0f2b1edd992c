//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::Cli;

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    let mut config = load_config_file(cli)?;

    let env_overrides = TomlConfigAdapter::apply_env_overrides(&mut config, |key| std::env::var(key).ok())
        .context("Invalid environment override")?;
    if env_overrides > 0 {
        debug!("Applied {} environment variable override(s)", env_overrides);
    }

    let cli_overrides = apply_cli_overrides(&mut config, cli);
    if cli_overrides > 0 {
        debug!("Applied {} CLI override(s)", cli_overrides);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Explicit `--config` file, else the first default path found, else defaults
fn load_config_file(cli: &Cli) -> Result<AppConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => match TomlConfigAdapter::find_default_config() {
            Some(path) => path,
            None => return Ok(AppConfig::default()),
        },
    };

    debug!("Loading configuration from: {}", path.display());
    TomlConfigAdapter::load_config(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Apply global CLI flags; returns how many were set
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut applied = 0;

    if let Some(level) = cli.log_level {
        config.log_level = level;
        applied += 1;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
        applied += 1;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.ffmpeg_path = ffmpeg.clone();
        applied += 1;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
        applied += 1;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
        applied += 1;
    }
    if let Some(crf) = cli.crf {
        config.crf = crf;
        applied += 1;
    }
    if let Some(preset) = &cli.preset {
        config.preset = preset.clone();
        applied += 1;
    }

    applied
}
