//! CLI module for vidsum
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// vidsum video summarizer
///
/// Samples frames, converts containers and builds summary videos from
/// ordered time ranges of a source file.
#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(about = "Build summary videos from timestamped ranges, sample frames and convert containers")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: vidsum.toml or config/vidsum.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level [error, warn, info, debug, trace]
    #[arg(long, global = true, value_parser = args::parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Log output format [pretty, compact, json]
    #[arg(long, global = true, value_parser = args::parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Path to the ffmpeg executable
    #[arg(long, global = true, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Directory outputs are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Encoder threads
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Constant Rate Factor (0-51)
    #[arg(long, global = true, value_parser = args::parse_crf)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Print the operation report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample still frames from a video
    Extract(args::ExtractArgs),
    /// Re-encode a video into avi, mov or mp4
    Convert(args::ConvertArgs),
    /// Cut ranges from a video and join them into one summary file
    Summarize(args::SummarizeArgs),
    /// Inspect video file information
    Inspect(args::InspectArgs),
}
