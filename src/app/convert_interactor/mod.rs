// Convert interactor - Orchestrates container conversion use case

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::app::ensure_supported_input;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for format conversion use case
pub struct ConvertInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
    settings: EncodeSettings,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        settings: EncodeSettings,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            fs_port,
            settings,
        }
    }

    /// Re-encode the source into the requested container
    pub async fn execute(&self, request: ConvertRequest) -> Result<ConvertReport, DomainError> {
        info!(
            "Starting conversion of {} to {}",
            request.input.display(),
            request.format
        );

        let result = self.convert(&request).await;
        if let Err(e) = &result {
            error!("Conversion failed: {}", e);
        }
        result
    }

    async fn convert(&self, request: &ConvertRequest) -> Result<ConvertReport, DomainError> {
        ensure_supported_input(self.fs_port.as_ref(), &request.input).await?;

        let source = self.probe_port.probe_media(&request.input).await?;
        if !source.has_video() {
            return Err(DomainError::ProbeFail(format!(
                "No video stream in {}",
                request.input.display()
            )));
        }
        debug!(
            "Source: {} ({:.3}s, {} stream(s))",
            source.container,
            source.duration,
            source.total_streams()
        );

        if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs_port.create_directory(parent).await?;
        }

        let plan = ConversionPlan {
            input: request.input.clone(),
            output: request.output.clone(),
            format: request.format,
            settings: self.settings.clone(),
        };
        self.execute_port.convert(&plan).await?;

        let media_info = self.probe_output(&request.output).await?;
        info!(
            "Converted {} into {}",
            request.input.display(),
            request.output.display()
        );

        Ok(ConvertReport {
            output: request.output.clone(),
            format: request.format,
            media_info,
            completed_at: Utc::now(),
        })
    }

    async fn probe_output(&self, output: &Path) -> Result<MediaInfo, DomainError> {
        let media_info = self.probe_port.probe_media(output).await?;
        if !media_info.has_video() {
            return Err(DomainError::ExecFail(format!(
                "Converted file {} has no video stream",
                output.display()
            )));
        }
        Ok(media_info)
    }
}
