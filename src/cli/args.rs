//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgAction, Args};

use crate::app::InspectFormat;
use crate::domain::model::{ContainerFormat, MAX_FPS, MIN_FPS};
use crate::utils::logging::{LogFormat, LogLevel};

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Frames sampled per second of video (1-10)
    #[arg(long, default_value_t = 1, value_parser = parse_fps)]
    pub fps: u32,

    /// Directory frames are written to (default: <output-dir>/frames)
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target container [avi, mov, mp4]
    #[arg(short, long, value_parser = parse_container)]
    pub format: ContainerFormat,

    /// Output file path (default: <output-dir>/converted.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// CSV file with Start and Stop columns
    #[arg(long, value_name = "CSV", conflicts_with = "ranges", required_unless_present = "ranges")]
    pub table: Option<PathBuf>,

    /// Range to keep, HH:MM:SS; repeat for up to five ranges
    #[arg(long = "range", value_name = "START,STOP", action = ArgAction::Append)]
    pub ranges: Vec<String>,

    /// Leave the audio track out of the summary
    #[arg(long)]
    pub no_audio: bool,

    /// Output file path (default: <output-dir>/summary_output.mp4)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format [text, json, yaml]
    #[arg(long, default_value = "text", value_parser = parse_inspect_format)]
    pub format: InspectFormat,
}

pub fn parse_fps(s: &str) -> Result<u32, String> {
    clap_num::number_range(s, MIN_FPS, MAX_FPS)
}

pub fn parse_crf(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

pub fn parse_container(s: &str) -> Result<ContainerFormat, String> {
    ContainerFormat::parse(s).map_err(|e| e.to_string())
}

pub fn parse_inspect_format(s: &str) -> Result<InspectFormat, String> {
    InspectFormat::parse(s).map_err(|e| e.to_string())
}

pub fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).map_err(|e| e.to_string())
}

pub fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).map_err(|e| e.to_string())
}
