// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Timestamp text matched none of the accepted formats
    #[error("Invalid timestamp '{input}': expected HH:MM:SS or MM:SS")]
    InvalidTimestamp { input: String },

    /// Stop does not come after start
    #[error("Invalid time range: stop ({stop}) must be later than start ({start})")]
    InvalidTimeRange { start: String, stop: String },

    /// Range table is unreadable or lacks required columns
    #[error("Invalid range table: {0}")]
    InvalidTable(String),

    /// Range reaches past the end of the source
    #[error("Range {start}s-{stop}s exceeds source duration of {duration:.3}s")]
    OutOfRange { start: f64, stop: f64, duration: f64 },

    /// Container is not one of avi/mov/mp4
    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Media probing failed
    #[error("Failed to probe media: {0}")]
    ProbeFail(String),

    /// The ffmpeg executable failed or could not be started
    #[error("Media processing failed: {0}")]
    ExecFail(String),

    /// Filesystem operation failed
    #[error("Filesystem error: {0}")]
    FsFail(String),
}

impl DomainError {
    /// True for errors raised before any media work starts
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidTimestamp { .. }
                | DomainError::InvalidTimeRange { .. }
                | DomainError::InvalidTable(_)
                | DomainError::OutOfRange { .. }
                | DomainError::UnsupportedFormat(_)
                | DomainError::BadArgs(_)
                | DomainError::InvalidConfig(_)
        )
    }
}
