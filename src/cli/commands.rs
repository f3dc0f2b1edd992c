//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::AppConfig;
use crate::app::inspect_interactor::to_json;
use crate::app::{AppContainer, InspectFormat, InspectRequest};
use crate::cli::args::{ConvertArgs, ExtractArgs, InspectArgs, SummarizeArgs};
use crate::cli::{Cli, Commands};
use crate::domain::model::*;
use crate::domain::rules::{RangeEntry, RangeValidation, RangeValidator};

/// Dispatch the parsed command
pub async fn run(cli: Cli, container: &dyn AppContainer, config: &AppConfig) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Extract(args) => extract(args, container, config, json).await,
        Commands::Convert(args) => convert(args, container, config, json).await,
        Commands::Summarize(args) => summarize(args, container, config, json).await,
        Commands::Inspect(args) => inspect(args, container, json).await,
    }
}

/// Execute the extract command
pub async fn extract(args: ExtractArgs, container: &dyn AppContainer, config: &AppConfig, json: bool) -> Result<()> {
    let frames_dir = args.frames_dir.unwrap_or_else(|| config.frames_path());
    let request = ExtractFramesRequest::new(args.input, args.fps, frames_dir)?;

    let report = container
        .extract_interactor()
        .execute(request)
        .await
        .context("Frame extraction failed")?;

    if json {
        return print_json(&report);
    }
    println!(
        "Extracted {} frame(s) at {} fps into {}",
        report.frame_count,
        report.fps,
        report.frames_dir.display()
    );
    for frame in &report.preview {
        println!("  {}", frame.display());
    }
    Ok(())
}

/// Execute the convert command
pub async fn convert(args: ConvertArgs, container: &dyn AppContainer, config: &AppConfig, json: bool) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| config.output_dir.join(format!("converted.{}", args.format.extension())));
    let request = ConvertRequest::new(args.input, args.format, output)?;

    let report = container
        .convert_interactor()
        .execute(request)
        .await
        .context("Conversion failed")?;

    if json {
        return print_json(&report);
    }
    let resolution = report
        .media_info
        .primary_video_stream()
        .map(|video| format!("{}x{}, ", video.width, video.height))
        .unwrap_or_default();
    println!(
        "Converted to {} ({}{:.3}s, {} stream(s)): {}",
        report.format,
        resolution,
        report.media_info.duration,
        report.media_info.total_streams(),
        report.output.display()
    );
    Ok(())
}

/// Execute the summarize command
pub async fn summarize(args: SummarizeArgs, container: &dyn AppContainer, config: &AppConfig, json: bool) -> Result<()> {
    let ranges = match &args.table {
        Some(table) => table_ranges(container, table).await?,
        None => manual_ranges(&args.ranges)?,
    };
    info!("Accepted {} range(s)", ranges.len());

    let output = args.output.unwrap_or_else(|| config.summary_path());
    let request = SummaryRequest::new(args.input, ranges, !args.no_audio, output);

    let report = container
        .summarize_interactor()
        .execute(request)
        .await
        .context("Summary failed")?;

    if json {
        return print_json(&report);
    }
    println!(
        "Summary of {} clip(s) written to {} ({:.3}s{})",
        report.clip_count,
        report.output.display(),
        report.actual_duration,
        if report.audio_included { ", with audio" } else { ", no audio" }
    );
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, container: &dyn AppContainer, json: bool) -> Result<()> {
    let input = args.input.clone();
    let format = resolve_inspect_format(args.format, json);
    let response = container
        .inspect_interactor()
        .execute(InspectRequest::new(args.input, format))
        .await
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Global `--json` overrides the inspect `--format` choice
pub fn resolve_inspect_format(requested: InspectFormat, json: bool) -> InspectFormat {
    if json {
        InspectFormat::Json
    } else {
        requested
    }
}

/// Split `START,STOP` values into numbered entries
pub fn manual_entries(values: &[String]) -> Vec<RangeEntry> {
    values
        .iter()
        .enumerate()
        .map(|(n, value)| {
            let (start, stop) = value.split_once(',').unwrap_or((value.as_str(), ""));
            RangeEntry::new(n + 1, start.trim(), stop.trim())
        })
        .collect()
}

/// Validate manual ranges; bad ones are reported and dropped
pub fn manual_ranges(values: &[String]) -> Result<TimeRangeSet> {
    let validation = RangeValidator::validate_manual(&manual_entries(values))?;
    report_rejected(&validation);
    validation
        .into_manual_set()
        .context("No valid range was entered")
}

async fn table_ranges(container: &dyn AppContainer, table: &Path) -> Result<TimeRangeSet> {
    let entries = container
        .table_port()
        .read_ranges(table)
        .await
        .with_context(|| format!("Failed to read {}", table.display()))?;

    let validation = RangeValidator::validate_table(&entries);
    report_rejected(&validation);
    validation
        .into_table_set()
        .with_context(|| format!("Range table {} was not accepted", table.display()))
}

fn report_rejected(validation: &RangeValidation) {
    for diagnostic in &validation.rejected {
        warn!("Rejected range: {}", diagnostic);
        eprintln!("{}", diagnostic);
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", to_json(report)?);
    Ok(())
}
