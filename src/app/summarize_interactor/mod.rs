// Summarize interactor - Orchestrates summary building use case

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::app::ensure_supported_input;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for summary building use case
pub struct SummarizeInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
    settings: EncodeSettings,
}

impl SummarizeInteractor {
    /// Create new summarize interactor with injected ports
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

    /// Cut every range from the source, join them in order and write one file
    pub async fn execute(&self, request: SummaryRequest) -> Result<SummaryReport, DomainError> {
        info!(
            "Starting summary of {} from {} clip(s)",
            request.input.display(),
            request.ranges.len()
        );

        let result = self.summarize(&request).await;
        if let Err(e) = &result {
            error!("Summary failed: {}", e);
        }
        result
    }

    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryReport, DomainError> {
        let format = ContainerFormat::from_path(&request.output)?;
        if same_file_path(&request.output, &request.input) {
            return Err(DomainError::BadArgs(format!(
                "Summary output must differ from the source: {}",
                request.input.display()
            )));
        }
        ensure_supported_input(self.fs_port.as_ref(), &request.input).await?;

        let source = self.probe_port.probe_media(&request.input).await?;
        if !source.has_video() {
            return Err(DomainError::ProbeFail(format!(
                "No video stream in {}",
                request.input.display()
            )));
        }
        RangeValidator::check_within_duration(&request.ranges, source.duration)?;

        let include_audio = request.include_audio && source.has_audio();
        if request.include_audio && !source.has_audio() {
            warn!(
                "{} has no audio stream; writing the summary without audio",
                request.input.display()
            );
        }

        for (n, range) in request.ranges.iter().enumerate() {
            debug!("Clip {}: {}", n + 1, range);
        }

        if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs_port.create_directory(parent).await?;
        }

        let plan = SummaryPlan {
            input: request.input.clone(),
            output: request.output.clone(),
            format,
            ranges: request.ranges.clone(),
            include_audio,
            settings: self.settings.clone(),
        };
        self.execute_port.summarize(&plan).await?;

        let written = self.probe_port.probe_media(&request.output).await?;
        let expected_duration = request.ranges.total_duration_seconds();
        info!(
            "Summary written to {} ({:.3}s, expected {:.3}s)",
            request.output.display(),
            written.duration,
            expected_duration
        );

        Ok(SummaryReport {
            output: request.output.clone(),
            clip_count: request.ranges.len(),
            expected_duration,
            actual_duration: written.duration,
            audio_included: written.has_audio(),
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fakes::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ranges(pairs: &[(&str, &str)]) -> TimeRangeSet {
        TimeRangeSet::new(
            pairs
                .iter()
                .map(|(start, stop)| TimeRange::parse(start, stop).unwrap())
                .collect(),
        )
        .unwrap()
    }

    struct Fixture {
        _dir: TempDir,
        input: PathBuf,
        output: PathBuf,
        probe: Arc<FakeProbe>,
    }

    fn fixture(duration: f64, with_audio: bool) -> Fixture {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("source.mp4");
        let output = dir.path().join("summary_output.mp4");
        std::fs::write(&input, b"video").unwrap();
        let probe = Arc::new(FakeProbe::default().with(media_info(&input, duration, with_audio)));
        Fixture {
            _dir: dir,
            input,
            output,
            probe,
        }
    }

    #[tokio::test]
    async fn test_summary_of_two_ranges() {
        let fx = fixture(10.0, true);
        fx.probe.set(media_info(&fx.output, 4.0, true));
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(fx.probe.clone(), execute.clone(), local_fs(), settings());

        let set = ranges(&[("00:00:00", "00:00:02"), ("00:00:05", "00:00:07")]);
        let request = SummaryRequest::new(fx.input.clone(), set.clone(), true, fx.output.clone());
        let report = interactor.execute(request).await.unwrap();

        assert_eq!(report.clip_count, 2);
        assert_eq!(report.expected_duration, 4.0);
        assert_eq!(report.actual_duration, 4.0);
        assert!(report.audio_included);

        let plans = execute.summaries.lock().unwrap();
        assert_eq!(plans[0].ranges, set);
        assert_eq!(plans[0].format, ContainerFormat::Mp4);
        assert!(plans[0].include_audio);
    }

    #[tokio::test]
    async fn test_audio_disabled() {
        let fx = fixture(10.0, true);
        fx.probe.set(media_info(&fx.output, 2.0, false));
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(fx.probe.clone(), execute.clone(), local_fs(), settings());

        let request = SummaryRequest::new(
            fx.input.clone(),
            ranges(&[("00:00:01", "00:00:03")]),
            false,
            fx.output.clone(),
        );
        let report = interactor.execute(request).await.unwrap();

        assert!(!report.audio_included);
        assert!(!execute.summaries.lock().unwrap()[0].include_audio);
    }

    #[tokio::test]
    async fn test_audio_requested_on_silent_source() {
        let fx = fixture(10.0, false);
        fx.probe.set(media_info(&fx.output, 2.0, false));
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(fx.probe.clone(), execute.clone(), local_fs(), settings());

        let request = SummaryRequest::new(
            fx.input.clone(),
            ranges(&[("00:00", "00:02")]),
            true,
            fx.output.clone(),
        );
        let report = interactor.execute(request).await.unwrap();

        assert!(!report.audio_included);
        assert!(!execute.summaries.lock().unwrap()[0].include_audio);
    }

    #[tokio::test]
    async fn test_range_past_end_is_rejected_before_encoding() {
        let fx = fixture(6.0, true);
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(fx.probe.clone(), execute.clone(), local_fs(), settings());

        let request = SummaryRequest::new(
            fx.input.clone(),
            ranges(&[("00:00:00", "00:00:02"), ("00:00:05", "00:00:07")]),
            true,
            fx.output.clone(),
        );
        let err = interactor.execute(request).await.unwrap_err();

        assert!(matches!(err, DomainError::OutOfRange { stop, .. } if stop == 7.0));
        assert!(execute.summaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_output_extension() {
        let fx = fixture(10.0, true);
        let interactor = SummarizeInteractor::new(
            fx.probe.clone(),
            Arc::new(FakeExecute::default()),
            local_fs(),
            settings(),
        );
        let output = fx.output.with_extension("gif");

        let request = SummaryRequest::new(fx.input.clone(), ranges(&[("00:00", "00:02")]), true, output);
        assert!(interactor.execute(request).await.is_err());
    }

    #[tokio::test]
    async fn test_encoder_failure_leaves_no_output() {
        let fx = fixture(10.0, true);
        let interactor = SummarizeInteractor::new(
            fx.probe.clone(),
            Arc::new(FakeExecute::failing()),
            local_fs(),
            settings(),
        );

        let request = SummaryRequest::new(
            fx.input.clone(),
            ranges(&[("00:00:00", "00:00:02")]),
            true,
            fx.output.clone(),
        );
        let err = interactor.execute(request).await.unwrap_err();

        assert!(matches!(err, DomainError::ExecFail(_)));
        assert!(!fx.output.exists());
    }

    #[tokio::test]
    async fn test_output_aliasing_the_source_is_rejected() {
        let fx = fixture(10.0, true);
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(fx.probe.clone(), execute.clone(), local_fs(), settings());

        let dir = fx.input.parent().unwrap();
        let aliases = [
            dir.join(".").join("source.mp4"),
            dir.join("..").join(dir.file_name().unwrap()).join("source.mp4"),
        ];
        for alias in aliases {
            let request = SummaryRequest::new(fx.input.clone(), ranges(&[("00:00", "00:02")]), true, alias);
            let err = interactor.execute(request).await.unwrap_err();
            assert!(matches!(err, DomainError::BadArgs(_)));
        }
        assert!(execute.summaries.lock().unwrap().is_empty());
        assert_eq!(std::fs::read(&fx.input).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_unsupported_source_container() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("source.mkv");
        std::fs::write(&input, b"video").unwrap();
        let execute = Arc::new(FakeExecute::default());
        let interactor = SummarizeInteractor::new(
            Arc::new(FakeProbe::default().with(media_info(&input, 10.0, true))),
            execute.clone(),
            local_fs(),
            settings(),
        );

        let request = SummaryRequest::new(
            input,
            ranges(&[("00:00", "00:02")]),
            true,
            dir.path().join("summary_output.mp4"),
        );
        let err = interactor.execute(request).await.unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedFormat(_)));
        assert!(execute.summaries.lock().unwrap().is_empty());
    }
}
