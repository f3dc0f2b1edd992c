// Probe LibAV adapter - Media file analysis using libav

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// LibAV-based media probing adapter
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg::init()
            .map_err(|e| DomainError::ProbeFail(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }

    /// Open the file with libav and read container and stream headers
    fn probe_blocking(path: &Path) -> Result<MediaInfo, DomainError> {
        let file_size = std::fs::metadata(path)
            .map_err(|e| DomainError::ProbeFail(format!("Cannot read {}: {}", path.display(), e)))?
            .len();

        let input = ffmpeg::format::input(path)
            .map_err(|e| DomainError::ProbeFail(format!("Cannot open {}: {}", path.display(), e)))?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();

        for stream in input.streams() {
            let parameters = stream.parameters();
            let codec = parameters.id().name().to_string();

            match parameters.medium() {
                ffmpeg::media::Type::Video => {
                    let decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
                        .and_then(|ctx| ctx.decoder().video())
                        .map_err(|e| {
                            DomainError::ProbeFail(format!("Cannot read video stream {}: {}", stream.index(), e))
                        })?;
                    let rate = stream.avg_frame_rate();
                    let frame_rate = if rate.denominator() != 0 { f64::from(rate) } else { 0.0 };

                    video_streams.push(VideoStreamInfo {
                        index: stream.index(),
                        codec,
                        width: decoder.width(),
                        height: decoder.height(),
                        frame_rate,
                    });
                }
                ffmpeg::media::Type::Audio => {
                    let decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
                        .and_then(|ctx| ctx.decoder().audio())
                        .map_err(|e| {
                            DomainError::ProbeFail(format!("Cannot read audio stream {}: {}", stream.index(), e))
                        })?;

                    audio_streams.push(AudioStreamInfo {
                        index: stream.index(),
                        codec,
                        sample_rate: decoder.rate(),
                    });
                }
                other => debug!("Ignoring {:?} stream {}", other, stream.index()),
            }
        }

        let duration = Self::container_duration(&input);
        let bit_rate = u64::try_from(input.bit_rate()).ok().filter(|rate| *rate > 0);

        Ok(MediaInfo {
            path: path.to_path_buf(),
            container: input.format().name().to_string(),
            duration,
            file_size,
            bit_rate,
            video_streams,
            audio_streams,
        })
    }

    /// Container duration, falling back to the longest stream
    fn container_duration(input: &ffmpeg::format::context::Input) -> f64 {
        if input.duration() > 0 {
            return input.duration() as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);
        }

        input
            .streams()
            .filter(|stream| stream.duration() > 0)
            .map(|stream| stream.duration() as f64 * f64::from(stream.time_base()))
            .fold(0.0, f64::max)
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        let path: PathBuf = file_path.to_path_buf();
        debug!("Probing {}", path.display());

        tokio::task::spawn_blocking(move || Self::probe_blocking(&path))
            .await
            .map_err(|e| DomainError::ProbeFail(format!("Probe task failed: {}", e)))?
    }
}
