// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::RangeEntry;

/// File name prefix and extension of extracted frames
pub const FRAME_PREFIX: &str = "frame_";
pub const FRAME_EXTENSION: &str = "jpg";

/// Port for media file probing and analysis
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe media file and return container, duration and stream layout
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError>;
}

/// Encoder settings shared by every re-encoding operation
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
    pub threads: usize,
}

/// Fully resolved frame extraction
#[derive(Debug, Clone, PartialEq)]
pub struct FrameExtractionPlan {
    pub input: PathBuf,
    pub frames_dir: PathBuf,
    pub fps: u32,
    /// Hard cap on emitted images
    pub frame_count: u64,
}

impl FrameExtractionPlan {
    /// printf-style pattern ffmpeg numbers frames with, starting at 0
    pub fn file_pattern(&self) -> PathBuf {
        self.frames_dir
            .join(format!("{}%04d.{}", FRAME_PREFIX, FRAME_EXTENSION))
    }
}

/// Fully resolved container conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ContainerFormat,
    pub settings: EncodeSettings,
}

/// Fully resolved summary build
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ContainerFormat,
    pub ranges: TimeRangeSet,
    /// Already reconciled with the source: false when the source has no audio
    pub include_audio: bool,
    pub settings: EncodeSettings,
}

/// Port for media execution
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Sample frames into `plan.frames_dir`
    async fn extract_frames(&self, plan: &FrameExtractionPlan) -> Result<(), DomainError>;

    /// Re-encode into another container
    async fn convert(&self, plan: &ConversionPlan) -> Result<(), DomainError>;

    /// Cut, concatenate and encode the summary
    async fn summarize(&self, plan: &SummaryPlan) -> Result<(), DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Sorted list of `<prefix>*.<extension>` files directly inside `dir_path`
    async fn list_files(
        &self,
        dir_path: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<Vec<PathBuf>, DomainError>;

    /// Delete `<prefix>*.<extension>` files directly inside `dir_path`
    async fn remove_files(
        &self,
        dir_path: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<usize, DomainError>;
}

/// Port for reading tabular range input
#[async_trait]
pub trait TablePort: Send + Sync {
    /// Read `Start`/`Stop` pairs, one entry per data row
    async fn read_ranges(&self, file_path: &Path) -> Result<Vec<RangeEntry>, DomainError>;
}
