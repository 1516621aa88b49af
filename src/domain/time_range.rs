//! Reporting time range

use super::errors::UsageExportError;
use super::result::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::fmt;

/// Accepted timestamp shape: `YYYY-MM-DDThh:mm:ssZ`
const TIMESTAMP_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$";

/// chrono format matching [`TIMESTAMP_PATTERN`]
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Half-open UTC interval a usage report covers
///
/// Invariant: `start < end`. Built once at startup and never mutated.
///
/// # Examples
///
/// ```
/// use usage_export::domain::TimeRange;
///
/// let range = TimeRange::parse("2024-11-01T00:00:00Z", "2024-11-30T23:59:59Z").unwrap();
/// assert_eq!(range.date_label(), "2024-11-01_2024-11-30");
/// assert!(TimeRange::parse("2024-11-30T00:00:00Z", "2024-11-01T00:00:00Z").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Parses and validates a start/end pair
    ///
    /// # Errors
    ///
    /// Returns [`UsageExportError::Configuration`] when either timestamp is
    /// not in `YYYY-MM-DDThh:mm:ssZ` form, is not a real date, or when
    /// `start` is not strictly before `end`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_timestamp("START_DATE", start)?;
        let end = parse_timestamp("END_DATE", end)?;
        Self::new(start, end)
    }

    /// Builds a range from already parsed instants
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(UsageExportError::Configuration(format!(
                "Time range start ({}) must be before end ({})",
                start.format(TIMESTAMP_FORMAT),
                end.format(TIMESTAMP_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Start of the range
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the range
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start formatted the way the API expects
    pub fn start_wire(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    /// End formatted the way the API expects
    pub fn end_wire(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }

    /// `YYYY-MM-DD_YYYY-MM-DD`, used in report file names
    pub fn date_label(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_wire(), self.end_wire())
    }
}

fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>> {
    let pattern = Regex::new(TIMESTAMP_PATTERN)
        .map_err(|e| UsageExportError::Configuration(format!("Invalid timestamp pattern: {e}")))?;

    if !pattern.is_match(value) {
        return Err(UsageExportError::Configuration(format!(
            "{name} '{value}' is not in the format YYYY-MM-DDThh:mm:ssZ (e.g. 2024-11-01T09:00:00Z)"
        )));
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            UsageExportError::Configuration(format!("{name} '{value}' is not a valid date: {e}"))
        })
}
