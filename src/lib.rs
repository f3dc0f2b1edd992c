//! vidsum video summarizer library
//!
//! Parses timestamped ranges, samples frames, converts containers and joins
//! ranges of a source video into one summary file.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    AudioStreamInfo, ContainerFormat, MediaInfo, TimeRange, TimeRangeSet, Timestamp, VideoStreamInfo,
};
