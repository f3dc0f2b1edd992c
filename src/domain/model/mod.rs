// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;

/// Accepted textual timestamp layouts, tried in `PARSE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `HH:MM:SS`
    HourMinuteSecond,
    /// `MM:SS`
    MinuteSecond,
}

impl TimestampFormat {
    /// Order in which formats are attempted by `Timestamp::parse`
    pub const PARSE_ORDER: [TimestampFormat; 2] = [
        TimestampFormat::HourMinuteSecond,
        TimestampFormat::MinuteSecond,
    ];

    /// Upper bound of each colon-separated field, most significant first
    fn field_limits(&self) -> &'static [u32] {
        match self {
            TimestampFormat::HourMinuteSecond => &[23, 59, 59],
            TimestampFormat::MinuteSecond => &[59, 59],
        }
    }

    /// Parse `text` in exactly this layout, returning total seconds
    pub fn try_parse(&self, text: &str) -> Option<u32> {
        let limits = self.field_limits();
        let fields: Vec<&str> = text.split(':').collect();
        if fields.len() != limits.len() {
            return None;
        }

        let mut total = 0u32;
        for (field, limit) in fields.iter().zip(limits) {
            if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: u32 = field.parse().ok()?;
            if value > *limit {
                return None;
            }
            total = total * 60 + value;
        }

        Some(total)
    }
}

/// A non-negative offset into a video, parsed from text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp {
    seconds: u32,
}

impl Timestamp {
    /// Create a timestamp from whole seconds
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Parse `HH:MM:SS`, falling back to `MM:SS`
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        TimestampFormat::PARSE_ORDER
            .iter()
            .find_map(|format| format.try_parse(trimmed))
            .map(Self::from_seconds)
            .ok_or_else(|| DomainError::InvalidTimestamp {
                input: text.to_string(),
            })
    }

    /// Parse `HH:MM:SS` only, as required for manually entered ranges
    pub fn parse_strict(text: &str) -> Result<Self, DomainError> {
        TimestampFormat::HourMinuteSecond
            .try_parse(text.trim())
            .map(Self::from_seconds)
            .ok_or_else(|| DomainError::InvalidTimestamp {
                input: text.to_string(),
            })
    }

    /// Whole seconds
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Seconds as floating point, the unit the media toolchain takes
    pub fn as_seconds(&self) -> f64 {
        self.seconds as f64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// A half-open `[start, stop)` span of the source video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub stop: Timestamp,
}

impl TimeRange {
    /// Create a range, rejecting stop <= start
    pub fn new(start: Timestamp, stop: Timestamp) -> Result<Self, DomainError> {
        if stop <= start {
            return Err(DomainError::InvalidTimeRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        Ok(Self { start, stop })
    }

    /// Build a range from table cells; either timestamp format is accepted
    pub fn parse(start: &str, stop: &str) -> Result<Self, DomainError> {
        Self::new(Timestamp::parse(start)?, Timestamp::parse(stop)?)
    }

    /// Build a range from manual entry; both ends must be `HH:MM:SS`
    pub fn parse_strict(start: &str, stop: &str) -> Result<Self, DomainError> {
        Self::new(Timestamp::parse_strict(start)?, Timestamp::parse_strict(stop)?)
    }

    /// Length of the range in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.stop.as_seconds() - self.start.as_seconds()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

/// Ordered, non-empty list of ranges; order is output clip order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRangeSet {
    ranges: Vec<TimeRange>,
}

impl TimeRangeSet {
    /// Create a set, rejecting an empty list
    pub fn new(ranges: Vec<TimeRange>) -> Result<Self, DomainError> {
        if ranges.is_empty() {
            return Err(DomainError::BadArgs(
                "At least one valid time range is required".to_string(),
            ));
        }
        Ok(Self { ranges })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sum of all range lengths, the expected output duration
    pub fn total_duration_seconds(&self) -> f64 {
        self.ranges.iter().map(TimeRange::duration_seconds).sum()
    }
}

/// Container formats accepted as input and offered as conversion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Avi,
    Mov,
    Mp4,
}

impl ContainerFormat {
    /// Parse container name, case-insensitive, optional leading dot
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().trim_start_matches('.').to_lowercase().as_str() {
            "avi" => Ok(ContainerFormat::Avi),
            "mov" => Ok(ContainerFormat::Mov),
            "mp4" => Ok(ContainerFormat::Mp4),
            _ => Err(DomainError::UnsupportedFormat(format!(
                "{} (supported: avi, mov, mp4)",
                name
            ))),
        }
    }

    /// Detect the container from a file extension
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| DomainError::UnsupportedFormat(format!("{} has no extension", path.display())))?;
        Self::parse(extension)
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Avi => "avi",
            ContainerFormat::Mov => "mov",
            ContainerFormat::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Video stream information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Audio stream information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
}

/// Complete media file information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    /// Demuxer name as reported by libav, e.g. `mov,mp4,m4a,3gp,3g2,mj2`
    pub container: String,
    /// Duration in seconds
    pub duration: f64,
    pub file_size: u64,
    pub bit_rate: Option<u64>,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
}

impl MediaInfo {
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get primary video stream (usually the first one)
    pub fn primary_video_stream(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get total number of streams
    pub fn total_streams(&self) -> usize {
        self.video_streams.len() + self.audio_streams.len()
    }
}

/// Lowest and highest accepted frame sampling rates
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 10;

/// Request to sample still frames from a video
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractFramesRequest {
    pub input: PathBuf,
    pub fps: u32,
    pub frames_dir: PathBuf,
}

impl ExtractFramesRequest {
    pub fn new(input: PathBuf, fps: u32, frames_dir: PathBuf) -> Result<Self, DomainError> {
        if !(MIN_FPS..=MAX_FPS).contains(&fps) {
            return Err(DomainError::BadArgs(format!(
                "Frame rate must be between {} and {}, got {}",
                MIN_FPS, MAX_FPS, fps
            )));
        }
        Ok(Self {
            input,
            fps,
            frames_dir,
        })
    }

    /// Number of images produced for a source of `duration` seconds
    pub fn expected_frame_count(&self, duration: f64) -> u64 {
        ((duration * self.fps as f64).floor() as u64).max(1)
    }
}

/// Absolute form of `path` for identity checks; the file itself need not exist
fn resolve_for_comparison(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// True when both paths name the same file, including `./`, `..` and symlinked spellings
pub fn same_file_path(a: &Path, b: &Path) -> bool {
    a == b || resolve_for_comparison(a) == resolve_for_comparison(b)
}

/// Request to re-encode a video into another container
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub format: ContainerFormat,
    pub output: PathBuf,
}

impl ConvertRequest {
    pub fn new(input: PathBuf, format: ContainerFormat, output: PathBuf) -> Result<Self, DomainError> {
        if same_file_path(&input, &output) {
            return Err(DomainError::BadArgs(format!(
                "Conversion output must differ from the source: {}",
                input.display()
            )));
        }
        if ContainerFormat::from_path(&output)? != format {
            return Err(DomainError::BadArgs(format!(
                "Output {} does not carry the .{} extension",
                output.display(),
                format
            )));
        }
        Ok(Self { input, format, output })
    }
}

/// Request to build a summary video from ordered ranges
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub input: PathBuf,
    pub ranges: TimeRangeSet,
    pub include_audio: bool,
    pub output: PathBuf,
}

impl SummaryRequest {
    pub fn new(input: PathBuf, ranges: TimeRangeSet, include_audio: bool, output: PathBuf) -> Self {
        Self {
            input,
            ranges,
            include_audio,
            output,
        }
    }
}

/// Outcome of a frame extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractFramesReport {
    pub frames_dir: PathBuf,
    pub fps: u32,
    pub frame_count: usize,
    /// First few frames, in order
    pub preview: Vec<PathBuf>,
    pub completed_at: DateTime<Utc>,
}

/// Outcome of a format conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub format: ContainerFormat,
    pub media_info: MediaInfo,
    pub completed_at: DateTime<Utc>,
}

/// Outcome of a summary build
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub output: PathBuf,
    pub clip_count: usize,
    /// Sum of the requested range lengths
    pub expected_duration: f64,
    /// Duration probed from the written file
    pub actual_duration: f64,
    /// Whether the output carries an audio track
    pub audio_included: bool,
    pub completed_at: DateTime<Utc>,
}
