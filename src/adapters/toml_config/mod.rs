// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::ports::EncodeSettings;
use crate::utils::logging::{LogFormat, LogLevel};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "VIDSUM_";

/// Config files searched, in order, when no explicit path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["vidsum.toml", "config/vidsum.toml"];

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// ffmpeg executable, looked up on PATH when bare
    pub ffmpeg_path: PathBuf,
    /// Directory outputs are written to
    pub output_dir: PathBuf,
    /// Frames directory name, relative to `output_dir`
    pub frames_dir: PathBuf,
    /// Summary file name, relative to `output_dir`
    pub summary_file: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
    pub threads: usize,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            output_dir: PathBuf::from("."),
            frames_dir: PathBuf::from("frames"),
            summary_file: PathBuf::from("summary_output.mp4"),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: num_cpus::get(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Frames directory resolved against the output directory
    pub fn frames_path(&self) -> PathBuf {
        self.output_dir.join(&self.frames_dir)
    }

    /// Summary file resolved against the output directory
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    /// Encoder settings for conversion and summary jobs
    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            preset: self.preset.clone(),
            crf: self.crf,
            threads: self.threads,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.crf > 51 {
            return Err(DomainError::InvalidConfig(format!(
                "crf must be between 0 and 51, got {}",
                self.crf
            )));
        }
        if self.threads == 0 {
            return Err(DomainError::InvalidConfig("threads must be at least 1".to_string()));
        }
        for (key, value) in [
            ("video_codec", &self.video_codec),
            ("audio_codec", &self.audio_codec),
            ("preset", &self.preset),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidConfig(format!("{} cannot be empty", key)));
            }
        }
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(DomainError::InvalidConfig("ffmpeg_path cannot be empty".to_string()));
        }
        if self.summary_file.file_name().is_none() {
            return Err(DomainError::InvalidConfig(format!(
                "summary_file is not a file name: {}",
                self.summary_file.display()
            )));
        }
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Deserialize config from TOML string; missing keys keep their defaults
    pub fn deserialize_config(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::InvalidConfig(format!("Failed to parse TOML config: {}", e)))
    }

    /// Serialize config to TOML string
    pub fn serialize_config(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }

    /// Load configuration from file
    pub fn load_config(file_path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;
        Self::deserialize_config(&content)
    }

    /// First existing file among the default search paths
    pub fn find_default_config() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Apply `VIDSUM_*` overrides read through `lookup`; returns how many applied
    pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let mut var = |key: &str| {
            let value = lookup(&format!("{}{}", ENV_PREFIX, key.to_uppercase()));
            if value.is_some() {
                applied += 1;
            }
            value
        };

        if let Some(value) = var("ffmpeg_path") {
            config.ffmpeg_path = PathBuf::from(value);
        }
        if let Some(value) = var("output_dir") {
            config.output_dir = PathBuf::from(value);
        }
        if let Some(value) = var("frames_dir") {
            config.frames_dir = PathBuf::from(value);
        }
        if let Some(value) = var("summary_file") {
            config.summary_file = PathBuf::from(value);
        }
        if let Some(value) = var("video_codec") {
            config.video_codec = value;
        }
        if let Some(value) = var("audio_codec") {
            config.audio_codec = value;
        }
        if let Some(value) = var("preset") {
            config.preset = value;
        }
        if let Some(value) = var("crf") {
            config.crf = value
                .trim()
                .parse()
                .map_err(|e| DomainError::InvalidConfig(format!("Invalid {}CRF value '{}': {}", ENV_PREFIX, value, e)))?;
        }
        if let Some(value) = var("threads") {
            config.threads = value.trim().parse().map_err(|e| {
                DomainError::InvalidConfig(format!("Invalid {}THREADS value '{}': {}", ENV_PREFIX, value, e))
            })?;
        }
        if let Some(value) = var("log_level") {
            config.log_level = LogLevel::parse(&value)?;
        }
        if let Some(value) = var("log_format") {
            config.log_format = LogFormat::parse(&value)?;
        }

        Ok(applied)
    }
}
