// used for timestamps, zone normalization is assumed to have happened upstream
use chrono::NaiveDateTime;
// used so time values can travel inside serialized filters
use serde::{Deserialize, Serialize};

// used to print out readable forms of a data type
use std::fmt;

use crate::error::{Result, TemporaError};

pub type Timestamp = NaiveDateTime;

/// The most precise calendar unit an instant was given with.
///
/// Ordered from coarse to fine, so `Precision::Year < Precision::Second`.
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}
impl Precision {
    /// A second-precise instant denotes a single point, anything coarser a span.
    pub fn is_reduced(&self) -> bool {
        *self < Precision::Second
    }
}
impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Precision::Year => "year",
            Precision::Month => "month",
            Precision::Day => "day",
            Precision::Hour => "hour",
            Precision::Minute => "minute",
            Precision::Second => "second",
        };
        write!(f, "{}", name)
    }
}

/// Whether a time value is a point or a span.
#[derive(Eq, PartialEq, PartialOrd, Ord, Debug, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Shape {
    Instant,
    Period,
}
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Instant => write!(f, "instant"),
            Shape::Period => write!(f, "period"),
        }
    }
}

/// A time value supplied by the caller as the "other" side of a relation.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Serialize, Deserialize)]
pub enum TimeValue {
    Instant {
        value: Timestamp,
        precision: Option<Precision>,
    },
    Period {
        start: Timestamp,
        end: Timestamp,
    },
}
impl TimeValue {
    pub fn instant(value: Timestamp) -> TimeValue {
        TimeValue::Instant { value, precision: None }
    }
    pub fn instant_with_precision(value: Timestamp, precision: Precision) -> TimeValue {
        TimeValue::Instant { value, precision: Some(precision) }
    }
    /// Builds a period, refusing to silently reorder endpoints.
    pub fn period(start: Timestamp, end: Timestamp) -> Result<TimeValue> {
        if start > end {
            return Err(TemporaError::MalformedPeriod { start, end });
        }
        Ok(TimeValue::Period { start, end })
    }
    /// The structural shape, before any normalization.
    pub fn shape(&self) -> Shape {
        match self {
            TimeValue::Instant { .. } => Shape::Instant,
            TimeValue::Period { .. } => Shape::Period,
        }
    }
    pub fn is_degenerate(&self) -> bool {
        matches!(self, TimeValue::Period { start, end } if start == end)
    }
}
impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeValue::Instant { value, precision: Some(p) } => write!(f, "{} ({})", value, p),
            TimeValue::Instant { value, precision: None } => write!(f, "{}", value),
            TimeValue::Period { start, end } => write!(f, "[{}, {}]", start, end),
        }
    }
}
