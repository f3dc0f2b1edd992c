// Test doubles for the ports used by interactor tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::FsLocalAdapter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Media info for a synthetic source
pub(crate) fn media_info(path: &Path, duration: f64, with_audio: bool) -> MediaInfo {
    MediaInfo {
        path: path.to_path_buf(),
        container: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
        duration,
        file_size: 1024,
        bit_rate: Some(400_000),
        video_streams: vec![VideoStreamInfo {
            index: 0,
            codec: "h264".to_string(),
            width: 320,
            height: 240,
            frame_rate: 25.0,
        }],
        audio_streams: if with_audio {
            vec![AudioStreamInfo {
                index: 1,
                codec: "aac".to_string(),
                sample_rate: 44_100,
            }]
        } else {
            Vec::new()
        },
    }
}

/// Probe that answers from a table, keyed by path
#[derive(Default)]
pub(crate) struct FakeProbe {
    answers: Mutex<HashMap<PathBuf, MediaInfo>>,
}

impl FakeProbe {
    pub(crate) fn with(self, info: MediaInfo) -> Self {
        self.set(info);
        self
    }

    pub(crate) fn set(&self, info: MediaInfo) {
        self.answers.lock().unwrap().insert(info.path.clone(), info);
    }
}

#[async_trait]
impl ProbePort for FakeProbe {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaInfo, DomainError> {
        self.answers
            .lock()
            .unwrap()
            .get(file_path)
            .cloned()
            .ok_or_else(|| DomainError::ProbeFail(format!("no media at {}", file_path.display())))
    }
}

/// Executor that writes placeholder outputs and records what it was asked to do
#[derive(Default)]
pub(crate) struct FakeExecute {
    pub(crate) fail: bool,
    pub(crate) extractions: Mutex<Vec<FrameExtractionPlan>>,
    pub(crate) conversions: Mutex<Vec<ConversionPlan>>,
    pub(crate) summaries: Mutex<Vec<SummaryPlan>>,
}

impl FakeExecute {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::ExecFail("ffmpeg exited with status 1".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ExecutePort for FakeExecute {
    async fn extract_frames(&self, plan: &FrameExtractionPlan) -> Result<(), DomainError> {
        self.extractions.lock().unwrap().push(plan.clone());
        self.check()?;
        for n in 0..plan.frame_count {
            let name = format!("{}{:04}.{}", FRAME_PREFIX, n, FRAME_EXTENSION);
            std::fs::write(plan.frames_dir.join(name), b"jpeg").unwrap();
        }
        Ok(())
    }

    async fn convert(&self, plan: &ConversionPlan) -> Result<(), DomainError> {
        self.conversions.lock().unwrap().push(plan.clone());
        self.check()?;
        std::fs::write(&plan.output, b"video").unwrap();
        Ok(())
    }

    async fn summarize(&self, plan: &SummaryPlan) -> Result<(), DomainError> {
        self.summaries.lock().unwrap().push(plan.clone());
        self.check()?;
        std::fs::write(&plan.output, b"video").unwrap();
        Ok(())
    }
}

pub(crate) fn settings() -> EncodeSettings {
    EncodeSettings {
        video_codec: "libx264".to_string(),
        audio_codec: "aac".to_string(),
        preset: "medium".to_string(),
        crf: 23,
        threads: 2,
    }
}

pub(crate) fn local_fs() -> Arc<dyn FsPort> {
    Arc::new(FsLocalAdapter::new())
}
