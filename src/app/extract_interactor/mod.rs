// Extract interactor - Orchestrates frame sampling use case

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::app::ensure_supported_input;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Number of frames listed in the report preview
pub const PREVIEW_FRAMES: usize = 10;

/// Interactor for frame extraction use case
pub struct ExtractInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
}

impl ExtractInteractor {
    /// Create new extract interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            fs_port,
        }
    }

    /// Sample frames from the source into the frames directory
    pub async fn execute(&self, request: ExtractFramesRequest) -> Result<ExtractFramesReport, DomainError> {
        info!(
            "Starting frame extraction for {} at {} fps",
            request.input.display(),
            request.fps
        );

        let result = self.extract(&request).await;
        if let Err(e) = &result {
            error!("Frame extraction failed: {}", e);
        }
        result
    }

    async fn extract(&self, request: &ExtractFramesRequest) -> Result<ExtractFramesReport, DomainError> {
        ensure_supported_input(self.fs_port.as_ref(), &request.input).await?;

        let media_info = self.probe_port.probe_media(&request.input).await?;
        if !media_info.has_video() {
            return Err(DomainError::ProbeFail(format!(
                "No video stream in {}",
                request.input.display()
            )));
        }
        debug!("Source duration: {:.3}s", media_info.duration);

        self.fs_port.create_directory(&request.frames_dir).await?;
        let removed = self
            .fs_port
            .remove_files(&request.frames_dir, FRAME_PREFIX, FRAME_EXTENSION)
            .await?;
        if removed > 0 {
            debug!("Removed {} stale frame(s)", removed);
        }

        let plan = FrameExtractionPlan {
            input: request.input.clone(),
            frames_dir: request.frames_dir.clone(),
            fps: request.fps,
            frame_count: request.expected_frame_count(media_info.duration),
        };
        debug!("Extracting up to {} frame(s)", plan.frame_count);
        self.execute_port.extract_frames(&plan).await?;

        let frames = self
            .fs_port
            .list_files(&request.frames_dir, FRAME_PREFIX, FRAME_EXTENSION)
            .await?;
        if frames.is_empty() {
            return Err(DomainError::ExecFail(format!(
                "No frames were written to {}",
                request.frames_dir.display()
            )));
        }

        info!(
            "Extracted {} frame(s) into {}",
            frames.len(),
            request.frames_dir.display()
        );

        Ok(ExtractFramesReport {
            frames_dir: request.frames_dir.clone(),
            fps: request.fps,
            frame_count: frames.len(),
            preview: frames.iter().take(PREVIEW_FRAMES).cloned().collect(),
            completed_at: Utc::now(),
        })
    }
}
