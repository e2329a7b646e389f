// used to pick apart ISO-8601 text
use regex::Regex;
// so the pattern is compiled once
use lazy_static::lazy_static;
// used for calendar arithmetic
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::datatype::{Precision, TimeValue, Timestamp};
use crate::error::{Result, TemporaError};

lazy_static! {
    static ref ISO_INSTANT: Regex = Regex::new(
        r"^(\d{4})(?:-(\d{2})(?:-(\d{2})(?:[T ](\d{2})(?::(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?)?)?)?Z?$"
    )
    .expect("ISO instant pattern is valid");
}

/// Calendar knowledge the resolver depends on: reading ISO-8601 text along
/// with the precision it was written in, and finding where a unit ends.
pub trait Calendar {
    fn parse(&self, text: &str) -> Result<(Timestamp, Precision)>;
    /// The last second of the `precision` unit containing `value`.
    fn end_of(&self, value: Timestamp, precision: Precision) -> Timestamp;
}

/// Gregorian calendar with second granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoCalendar;

fn parse_error(text: &str) -> TemporaError {
    TemporaError::Parse { message: format!("Invalid ISO-8601 instant '{}'", text) }
}

impl Calendar for IsoCalendar {
    fn parse(&self, text: &str) -> Result<(Timestamp, Precision)> {
        let text = text.trim();
        let captures = ISO_INSTANT.captures(text).ok_or_else(|| parse_error(text))?;
        let number = |i: usize| -> Option<u32> { captures.get(i).and_then(|m| m.as_str().parse::<u32>().ok()) };

        let year = captures[1].parse::<i32>().map_err(|_| parse_error(text))?;
        let precision = match (2..=6).rev().find(|&i| captures.get(i).is_some()) {
            Some(2) => Precision::Month,
            Some(3) => Precision::Day,
            Some(4) => Precision::Hour,
            Some(5) => Precision::Minute,
            Some(_) => Precision::Second,
            None => Precision::Year,
        };
        // fractional digits are scaled up to nanoseconds
        let nanos = match captures.get(7) {
            Some(m) => {
                let digits = m.as_str();
                let scaled = format!("{:0<9}", digits);
                scaled.parse::<u32>().map_err(|_| parse_error(text))?
            }
            None => 0,
        };
        let date = NaiveDate::from_ymd_opt(year, number(2).unwrap_or(1), number(3).unwrap_or(1))
            .ok_or_else(|| parse_error(text))?;
        let time = NaiveTime::from_hms_nano_opt(
            number(4).unwrap_or(0),
            number(5).unwrap_or(0),
            number(6).unwrap_or(0),
            nanos,
        )
        .ok_or_else(|| parse_error(text))?;
        Ok((NaiveDateTime::new(date, time), precision))
    }

    fn end_of(&self, value: Timestamp, precision: Precision) -> Timestamp {
        let date = value.date();
        let last_second = |d: NaiveDate, h: u32, m: u32| d.and_hms_opt(h, m, 59);
        let end = match precision {
            Precision::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31).and_then(|d| last_second(d, 23, 59)),
            Precision::Month => date
                .with_day(1)
                .and_then(|d| d.checked_add_months(Months::new(1)))
                .and_then(|d| d.pred_opt())
                .and_then(|d| last_second(d, 23, 59)),
            Precision::Day => last_second(date, 23, 59),
            Precision::Hour => last_second(date, value.hour(), 59),
            Precision::Minute => last_second(date, value.hour(), value.minute()),
            Precision::Second => value.with_nanosecond(0),
        };
        // only the last representable month can fail to find its successor
        end.unwrap_or(NaiveDateTime::MAX)
    }
}

/// Expands an instant written with reduced precision into the period it denotes.
#[derive(Debug, Clone, Default)]
pub struct ReducedPrecisionResolver<C: Calendar = IsoCalendar> {
    calendar: C,
}

impl ReducedPrecisionResolver<IsoCalendar> {
    pub fn new() -> Self {
        Self { calendar: IsoCalendar }
    }
}

impl<C: Calendar> ReducedPrecisionResolver<C> {
    pub fn with_calendar(calendar: C) -> Self {
        Self { calendar }
    }

    /// Returns the implied period of a reduced-precision instant, or `None` when
    /// the instant is already fully precise (or is not an instant at all).
    ///
    /// Idempotent: the end of a returned period resolves to `None`.
    pub fn resolve(&self, instant: &TimeValue) -> Option<TimeValue> {
        let (value, precision) = match instant {
            TimeValue::Instant { value, precision: Some(p) } if p.is_reduced() => (*value, *p),
            _ => return None,
        };
        let end = self.calendar.end_of(value, precision);
        if end <= value {
            return None;
        }
        debug!(%value, %precision, %end, "expanded reduced-precision instant");
        Some(TimeValue::Period { start: value, end })
    }

    /// Reads ISO-8601 text into an instant carrying its precision hint.
    /// Second precision needs no hint.
    pub fn instant(&self, text: &str) -> Result<TimeValue> {
        let (value, precision) = self.calendar.parse(text)?;
        Ok(TimeValue::Instant {
            value,
            precision: if precision.is_reduced() { Some(precision) } else { None },
        })
    }
}
