//! FFmpeg execution adapter
//!
//! Drives the `ffmpeg` executable for frame sampling, container conversion
//! and summary encoding. Argument lists are built by pure functions so they
//! can be checked without a toolchain installed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Lines of ffmpeg stderr kept in error messages
const STDERR_TAIL_LINES: usize = 12;

/// File name prefix of in-progress encodes
const STAGING_PREFIX: &str = ".vidsum-";

/// FFmpeg-based execution adapter
pub struct ExecFfmpegAdapter {
    ffmpeg_path: PathBuf,
}

impl ExecFfmpegAdapter {
    /// Create new FFmpeg adapter using the given executable
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Run ffmpeg to completion, mapping a non-zero exit to `ExecFail`
    async fn run(&self, args: Vec<OsString>) -> Result<(), DomainError> {
        debug!(
            "Running {} {}",
            self.ffmpeg_path.display(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                DomainError::ExecFail(format!(
                    "Cannot start {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        Err(DomainError::ExecFail(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            tail.trim()
        )))
    }

    /// Run an encode into a temporary sibling of `output`, renaming on success
    async fn run_staged<F>(
        &self,
        output: &Path,
        format: ContainerFormat,
        build_args: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce(&Path) -> Vec<OsString>,
    {
        let staged = stage_output(output, format)?;
        self.run(build_args(staged.path())).await?;

        staged.persist(output).map_err(|e| {
            DomainError::FsFail(format!(
                "Cannot move encoded file into {}: {}",
                output.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ExecutePort for ExecFfmpegAdapter {
    async fn extract_frames(&self, plan: &FrameExtractionPlan) -> Result<(), DomainError> {
        info!(
            "Sampling {} frame(s) at {} fps into {}",
            plan.frame_count,
            plan.fps,
            plan.frames_dir.display()
        );
        self.run(frame_extraction_args(plan)).await
    }

    async fn convert(&self, plan: &ConversionPlan) -> Result<(), DomainError> {
        info!("Converting {} to {}", plan.input.display(), plan.format);
        self.run_staged(&plan.output, plan.format, |staged| conversion_args(plan, staged))
            .await
    }

    async fn summarize(&self, plan: &SummaryPlan) -> Result<(), DomainError> {
        info!(
            "Encoding {} clip(s) from {} (audio: {})",
            plan.ranges.len(),
            plan.input.display(),
            plan.include_audio
        );
        self.run_staged(&plan.output, plan.format, |staged| summary_args(plan, staged))
            .await
    }
}

/// Create the temporary file an encode is written to before it is renamed
fn stage_output(output: &Path, format: ContainerFormat) -> Result<NamedTempFile, DomainError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let suffix = format!(".{}", format.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX).suffix(&suffix);
    // Same mode a plainly created output gets once the umask is applied
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    builder
        .tempfile_in(dir)
        .map_err(|e| {
            DomainError::FsFail(format!("Cannot create staging file in {}: {}", dir.display(), e))
        })
}

/// ffmpeg muxer name for a container
fn muxer_name(format: ContainerFormat) -> &'static str {
    match format {
        ContainerFormat::Avi => "avi",
        ContainerFormat::Mov => "mov",
        ContainerFormat::Mp4 => "mp4",
    }
}

fn common_input_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args
}

fn push_all(args: &mut Vec<OsString>, values: &[&str]) {
    args.extend(values.iter().map(OsString::from));
}

fn video_encode_args(args: &mut Vec<OsString>, settings: &EncodeSettings) {
    push_all(
        args,
        &[
            "-c:v",
            &settings.video_codec,
            "-preset",
            &settings.preset,
            "-crf",
            &settings.crf.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-threads",
            &settings.threads.to_string(),
        ],
    );
}

fn container_args(args: &mut Vec<OsString>, format: ContainerFormat, output: &Path) {
    if matches!(format, ContainerFormat::Mp4 | ContainerFormat::Mov) {
        push_all(args, &["-movflags", "+faststart"]);
    }
    push_all(args, &["-f", muxer_name(format)]);
    args.push(output.as_os_str().to_owned());
}

/// Arguments for sampling `frame_count` JPEG frames at `fps`
pub fn frame_extraction_args(plan: &FrameExtractionPlan) -> Vec<OsString> {
    let mut args = common_input_args(&plan.input);
    push_all(
        &mut args,
        &[
            "-vf",
            &format!("fps={}", plan.fps),
            "-frames:v",
            &plan.frame_count.to_string(),
            "-start_number",
            "0",
            "-q:v",
            "2",
        ],
    );
    args.push(plan.file_pattern().into_os_string());
    args
}

/// Arguments for re-encoding into `plan.format`
pub fn conversion_args(plan: &ConversionPlan, output: &Path) -> Vec<OsString> {
    let mut args = common_input_args(&plan.input);
    video_encode_args(&mut args, &plan.settings);
    push_all(&mut args, &["-c:a", &plan.settings.audio_codec]);
    container_args(&mut args, plan.format, output);
    args
}

/// Filter graph cutting each range `[start, stop)` and concatenating in order
pub fn summary_filter_graph(ranges: &TimeRangeSet, include_audio: bool) -> String {
    let mut chains = Vec::new();
    let mut concat_inputs = String::new();

    for (i, range) in ranges.iter().enumerate() {
        let start = range.start.as_seconds();
        let stop = range.stop.as_seconds();
        chains.push(format!(
            "[0:v:0]trim=start={:.3}:end={:.3},setpts=PTS-STARTPTS[v{}]",
            start, stop, i
        ));
        concat_inputs.push_str(&format!("[v{}]", i));

        if include_audio {
            chains.push(format!(
                "[0:a:0]atrim=start={:.3}:end={:.3},asetpts=PTS-STARTPTS[a{}]",
                start, stop, i
            ));
            concat_inputs.push_str(&format!("[a{}]", i));
        }
    }

    let outputs = if include_audio { "[outv][outa]" } else { "[outv]" };
    chains.push(format!(
        "{}concat=n={}:v=1:a={}{}",
        concat_inputs,
        ranges.len(),
        u8::from(include_audio),
        outputs
    ));

    chains.join(";")
}

/// Arguments for encoding the summary described by `plan`
pub fn summary_args(plan: &SummaryPlan, output: &Path) -> Vec<OsString> {
    let mut args = common_input_args(&plan.input);
    push_all(
        &mut args,
        &[
            "-filter_complex",
            &summary_filter_graph(&plan.ranges, plan.include_audio),
            "-map",
            "[outv]",
        ],
    );

    if plan.include_audio {
        push_all(&mut args, &["-map", "[outa]", "-c:a", &plan.settings.audio_codec]);
    } else {
        push_all(&mut args, &["-an"]);
    }

    video_encode_args(&mut args, &plan.settings);
    container_args(&mut args, plan.format, output);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EncodeSettings {
        EncodeSettings {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: 2,
        }
    }

    fn ranges(pairs: &[(&str, &str)]) -> TimeRangeSet {
        TimeRangeSet::new(
            pairs
                .iter()
                .map(|(start, stop)| TimeRange::parse(start, stop).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn value_after(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    }

    #[test]
    fn test_filter_graph_with_audio() {
        let graph = summary_filter_graph(&ranges(&[("00:00:00", "00:00:02"), ("00:00:05", "00:00:07")]), true);
        assert_eq!(
            graph,
            "[0:v:0]trim=start=0.000:end=2.000,setpts=PTS-STARTPTS[v0];\
             [0:a:0]atrim=start=0.000:end=2.000,asetpts=PTS-STARTPTS[a0];\
             [0:v:0]trim=start=5.000:end=7.000,setpts=PTS-STARTPTS[v1];\
             [0:a:0]atrim=start=5.000:end=7.000,asetpts=PTS-STARTPTS[a1];\
             [v0][a0][v1][a1]concat=n=2:v=1:a=1[outv][outa]"
        );
    }

    #[test]
    fn test_filter_graph_without_audio() {
        let graph = summary_filter_graph(&ranges(&[("00:01:00", "00:01:30")]), false);
        assert_eq!(
            graph,
            "[0:v:0]trim=start=60.000:end=90.000,setpts=PTS-STARTPTS[v0];[v0]concat=n=1:v=1:a=0[outv]"
        );
        assert!(!graph.contains("atrim"));
    }

    #[test]
    fn test_filter_graph_keeps_request_order() {
        let graph = summary_filter_graph(&ranges(&[("00:00:10", "00:00:12"), ("00:00:01", "00:00:02")]), false);
        let late = graph.find("start=10.000").unwrap();
        let early = graph.find("start=1.000").unwrap();
        assert!(late < early);
    }

    #[test]
    fn test_summary_args_without_audio_drops_audio() {
        let plan = SummaryPlan {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("summary_output.mp4"),
            format: ContainerFormat::Mp4,
            ranges: ranges(&[("00:00:00", "00:00:02")]),
            include_audio: false,
            settings: settings(),
        };
        let args = strings(&summary_args(&plan, Path::new("staged.mp4")));

        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"[outa]".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
        assert_eq!(value_after(&args, "-c:v").as_deref(), Some("libx264"));
        assert_eq!(value_after(&args, "-f").as_deref(), Some("mp4"));
        assert_eq!(args.last().map(String::as_str), Some("staged.mp4"));
    }

    #[test]
    fn test_summary_args_with_audio_maps_audio() {
        let plan = SummaryPlan {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("summary_output.mp4"),
            format: ContainerFormat::Mp4,
            ranges: ranges(&[("00:00:00", "00:00:02")]),
            include_audio: true,
            settings: settings(),
        };
        let args = strings(&summary_args(&plan, Path::new("staged.mp4")));

        assert!(args.contains(&"[outa]".to_string()));
        assert_eq!(value_after(&args, "-c:a").as_deref(), Some("aac"));
        assert!(!args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_conversion_args_avi() {
        let plan = ConversionPlan {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("converted.avi"),
            format: ContainerFormat::Avi,
            settings: settings(),
        };
        let args = strings(&conversion_args(&plan, Path::new("staged.avi")));

        assert_eq!(value_after(&args, "-i").as_deref(), Some("in.mp4"));
        assert_eq!(value_after(&args, "-c:v").as_deref(), Some("libx264"));
        assert_eq!(value_after(&args, "-c:a").as_deref(), Some("aac"));
        assert_eq!(value_after(&args, "-f").as_deref(), Some("avi"));
        assert!(!args.contains(&"-movflags".to_string()));
    }

    #[test]
    fn test_frame_extraction_args() {
        let plan = FrameExtractionPlan {
            input: PathBuf::from("in.mp4"),
            frames_dir: PathBuf::from("frames"),
            fps: 5,
            frame_count: 50,
        };
        let args = strings(&frame_extraction_args(&plan));

        assert_eq!(value_after(&args, "-vf").as_deref(), Some("fps=5"));
        assert_eq!(value_after(&args, "-frames:v").as_deref(), Some("50"));
        assert_eq!(value_after(&args, "-start_number").as_deref(), Some("0"));
        let pattern = PathBuf::from(args.last().unwrap());
        assert_eq!(pattern, Path::new("frames").join("frame_%04d.jpg"));
    }

    #[test]
    fn test_stage_output_in_target_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("summary.mp4");
        let staged = stage_output(&output, ContainerFormat::Mp4).unwrap();

        assert_eq!(staged.path().parent(), Some(dir.path()));
        assert_eq!(staged.path().extension().and_then(|e| e.to_str()), Some("mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_staged_output_mode_matches_plain_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let plain = dir.path().join("plain.mp4");
        std::fs::File::create(&plain).unwrap();
        let staged = stage_output(&dir.path().join("summary.mp4"), ContainerFormat::Mp4).unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(staged.path()), mode(&plain));
    }

    /// Executable that writes its last argument, then exits with `status`
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, status: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("ffmpeg");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nfor last; do :; done\necho partial > \"$last\"\necho boom >&2\nexit {}\n",
                status
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    fn staging_leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(STAGING_PREFIX))
            .collect()
    }

    #[cfg(unix)]
    fn summary_plan(dir: &Path, output: &str) -> SummaryPlan {
        SummaryPlan {
            input: dir.join("in.mp4"),
            output: dir.join(output),
            format: ContainerFormat::Mp4,
            ranges: ranges(&[("00:00:00", "00:00:02")]),
            include_audio: true,
            settings: settings(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_encode_keeps_previous_output() {
        let bin = tempfile::TempDir::new().unwrap();
        let adapter = ExecFfmpegAdapter::new(fake_ffmpeg(bin.path(), 1));
        let dir = tempfile::TempDir::new().unwrap();

        let existing = summary_plan(dir.path(), "existing.mp4");
        std::fs::write(&existing.output, "previous").unwrap();
        let err = adapter.summarize(&existing).await.unwrap_err();
        assert!(matches!(&err, DomainError::ExecFail(message) if message.contains("boom")));
        assert_eq!(std::fs::read_to_string(&existing.output).unwrap(), "previous");

        let fresh = summary_plan(dir.path(), "fresh.mp4");
        assert!(adapter.summarize(&fresh).await.is_err());
        assert!(!fresh.output.exists());

        assert!(staging_leftovers(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_encode_replaces_output() {
        let bin = tempfile::TempDir::new().unwrap();
        let adapter = ExecFfmpegAdapter::new(fake_ffmpeg(bin.path(), 0));
        let dir = tempfile::TempDir::new().unwrap();

        let plan = summary_plan(dir.path(), "summary.mp4");
        std::fs::write(&plan.output, "previous").unwrap();
        adapter.summarize(&plan).await.unwrap();

        assert_eq!(std::fs::read_to_string(&plan.output).unwrap(), "partial\n");
        assert!(staging_leftovers(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_executable_is_exec_failure() {
        let adapter = ExecFfmpegAdapter::new("/nonexistent/ffmpeg-binary");
        let err = adapter.run(vec![OsString::from("-version")]).await.unwrap_err();
        assert!(matches!(err, DomainError::ExecFail(_)));
    }
}
