// Inspect interactor - Orchestrates media file inspection use case

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::app::ensure_input_exists;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::{format_file_size, format_seconds};

/// Rendering of an inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Text,
    Json,
    Yaml,
}

impl InspectFormat {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InspectFormat::Text),
            "json" => Ok(InspectFormat::Json),
            "yaml" | "yml" => Ok(InspectFormat::Yaml),
            other => Err(DomainError::BadArgs(format!("Unknown inspect format: {}", other))),
        }
    }
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input: PathBuf,
    pub format: InspectFormat,
}

impl InspectRequest {
    /// Create new inspect request
    pub fn new(input: PathBuf, format: InspectFormat) -> Self {
        Self { input, format }
    }
}

/// Response from media file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub media_info: MediaInfo,
    pub summary: String,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self { probe_port, fs_port }
    }

    /// Execute media file inspection
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        info!("Inspecting {}", request.input.display());

        ensure_input_exists(self.fs_port.as_ref(), &request.input).await?;
        let media_info = self.probe_port.probe_media(&request.input).await?;

        let summary = match request.format {
            InspectFormat::Json => to_json(&media_info)?,
            InspectFormat::Yaml => to_yaml(&media_info)?,
            InspectFormat::Text => format_as_text(&media_info),
        };

        Ok(InspectResponse { media_info, summary })
    }
}

/// Pretty JSON rendering shared with the `--json` reports
pub fn to_json<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DomainError::BadArgs(format!("JSON serialization failed: {}", e)))
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_yaml::to_string(value)
        .map_err(|e| DomainError::BadArgs(format!("YAML serialization failed: {}", e)))
}

/// Format media info as human-readable text
pub fn format_as_text(media_info: &MediaInfo) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Media File Information:");
    let _ = writeln!(output, "  File: {}", media_info.path.display());
    let _ = writeln!(output, "  Container: {}", media_info.container);
    let _ = writeln!(output, "  Duration: {}", format_seconds(media_info.duration));
    let _ = writeln!(output, "  File Size: {}", format_file_size(media_info.file_size));
    if let Some(bit_rate) = media_info.bit_rate {
        let _ = writeln!(output, "  Bit Rate: {} kb/s", bit_rate / 1000);
    }
    let _ = writeln!(output, "  Total Streams: {}", media_info.total_streams());

    if !media_info.video_streams.is_empty() {
        let _ = writeln!(output, "\nVideo Streams ({}):", media_info.video_streams.len());
        for stream in &media_info.video_streams {
            let _ = writeln!(
                output,
                "  Stream #{}: {}x{} @ {:.2}fps, {}",
                stream.index, stream.width, stream.height, stream.frame_rate, stream.codec
            );
        }
    }

    if !media_info.audio_streams.is_empty() {
        let _ = writeln!(output, "\nAudio Streams ({}):", media_info.audio_streams.len());
        for stream in &media_info.audio_streams {
            let _ = writeln!(
                output,
                "  Stream #{}: {} Hz, {}",
                stream.index, stream.sample_rate, stream.codec
            );
        }
    }

    output
}
