//! Date ranges and windows in the API's timestamp convention.
//!
//! Timestamps are naive wall-clock values in Eastern Prevailing Time (EPT),
//! minute precision, rendered on the wire as `MM/DD/YYYY HH:MM`.

use super::provider::FetchError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format for range filter timestamps.
pub const WIRE_FORMAT: &str = "%m/%d/%Y %H:%M";

const DATETIME_FORMATS: &[&str] = &[WIRE_FORMAT, "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parse a user-supplied timestamp.
///
/// Accepts the wire format (month and day may be unpadded, e.g. `7/2/2024 00:00`),
/// ISO-style `YYYY-MM-DD HH:MM` / `YYYY-MM-DDTHH:MM`, and bare dates (midnight).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, FetchError> {
    let trimmed = input.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(FetchError::InvalidTimestamp {
        input: input.to_string(),
    })
}

/// Render a timestamp in the wire format (`07/02/2024 00:00`).
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Increment between the end of one window and the start of the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryStep {
    /// One calendar day, the increment observed against the live API.
    #[default]
    Day,
    /// One minute, the smallest unit the wire format can address.
    Minute,
}

impl BoundaryStep {
    pub fn duration(self) -> Duration {
        match self {
            BoundaryStep::Day => Duration::days(1),
            BoundaryStep::Minute => Duration::minutes(1),
        }
    }
}

/// An inclusive `[start, end]` range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends with [`parse_timestamp`].
    pub fn parse(start: &str, end: &str) -> Result<Self, FetchError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}

/// A planned sub-range no wider than the planner's span limit.
///
/// Only [`plan_windows`](super::window::plan_windows) creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    range: DateRange,
}

impl Window {
    pub(crate) fn from_bounds(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start <= end);
        Self {
            range: DateRange { start, end },
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.range.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.range.end
    }

    pub fn span(&self) -> Duration {
        self.range.span()
    }

    pub fn range(&self) -> DateRange {
        self.range
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.range.fmt(f)
    }
}
