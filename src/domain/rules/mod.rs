// Domain rules - Range validation policies

use std::fmt;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Manual entry accepts at most this many ranges
pub const MAX_MANUAL_RANGES: usize = 5;

/// Columns a range table must carry
pub const REQUIRED_COLUMNS: [&str; 2] = ["Start", "Stop"];

/// Slack allowed between a range's stop and the probed source duration
pub const DURATION_TOLERANCE_SECONDS: f64 = 0.25;

/// One raw (start, stop) pair as typed by the user or read from a table row
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEntry {
    /// 1-based position (manual slot or table row)
    pub position: usize,
    pub start: String,
    pub stop: String,
}

impl RangeEntry {
    pub fn new(position: usize, start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            position,
            start: start.into(),
            stop: stop.into(),
        }
    }
}

/// A rejected entry and why
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDiagnostic {
    pub position: usize,
    pub error: DomainError,
}

impl fmt::Display for RangeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp {}: {}", self.position, self.error)
    }
}

/// Accepted ranges in entry order plus per-entry diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeValidation {
    pub accepted: Vec<TimeRange>,
    pub rejected: Vec<RangeDiagnostic>,
}

impl RangeValidation {
    /// Manual entry: rejected slots are dropped, the rest must be non-empty
    pub fn into_manual_set(self) -> Result<TimeRangeSet, DomainError> {
        TimeRangeSet::new(self.accepted)
    }

    /// Table entry: any rejected row blocks the whole table
    pub fn into_table_set(self) -> Result<TimeRangeSet, DomainError> {
        if !self.rejected.is_empty() {
            let details: Vec<String> = self.rejected.iter().map(ToString::to_string).collect();
            return Err(DomainError::InvalidTable(format!(
                "{} invalid row(s): {}",
                self.rejected.len(),
                details.join("; ")
            )));
        }
        TimeRangeSet::new(self.accepted)
    }
}

/// Business rules for accepting time ranges
pub struct RangeValidator;

impl RangeValidator {
    /// Validate manually entered ranges; both ends must be `HH:MM:SS`
    pub fn validate_manual(entries: &[RangeEntry]) -> Result<RangeValidation, DomainError> {
        if entries.len() > MAX_MANUAL_RANGES {
            return Err(DomainError::BadArgs(format!(
                "At most {} manual ranges are accepted, got {}",
                MAX_MANUAL_RANGES,
                entries.len()
            )));
        }
        Ok(Self::collect(entries, TimeRange::parse_strict))
    }

    /// Validate table rows; each cell may be `HH:MM:SS` or `MM:SS`
    pub fn validate_table(entries: &[RangeEntry]) -> RangeValidation {
        Self::collect(entries, TimeRange::parse)
    }

    fn collect<F>(entries: &[RangeEntry], parse: F) -> RangeValidation
    where
        F: Fn(&str, &str) -> Result<TimeRange, DomainError>,
    {
        let mut validation = RangeValidation::default();
        for entry in entries {
            match parse(&entry.start, &entry.stop) {
                Ok(range) => validation.accepted.push(range),
                Err(error) => validation.rejected.push(RangeDiagnostic {
                    position: entry.position,
                    error,
                }),
            }
        }
        validation
    }

    /// Ensure a table header row carries the required columns
    pub fn check_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), DomainError> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !headers.iter().any(|h| h.as_ref().trim() == *required))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidTable(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Ensure every range ends within the source
    pub fn check_within_duration(ranges: &TimeRangeSet, duration: f64) -> Result<(), DomainError> {
        match ranges
            .iter()
            .find(|range| range.stop.as_seconds() > duration + DURATION_TOLERANCE_SECONDS)
        {
            Some(range) => Err(DomainError::OutOfRange {
                start: range.start.as_seconds(),
                stop: range.stop.as_seconds(),
                duration,
            }),
            None => Ok(()),
        }
    }
}
