//! Half-open time intervals and the observation window
//!
//! All intervals are `[start, end)`. The host engine reports intervals in a
//! closed, second-granular notation (`[10:30:00, 23:59:59]`); use
//! [`Interval::closed`] to convert from it.

use crate::IntervalType;
use chrono::{DateTime, Duration, Utc};
use digipod_diagnostics::{DGP0005, DGP0203, DigipodError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point on the time axis
pub type Timestamp = DateTime<Utc>;

/// Anything occupying a `[start, end)` span of the time axis
pub trait TimeRange {
    fn start(&self) -> Timestamp;
    fn end(&self) -> Timestamp;

    /// Whether `t` lies inside `[start, end)`
    fn contains(&self, t: Timestamp) -> bool {
        self.start() <= t && t < self.end()
    }

    fn duration(&self) -> Duration {
        self.end() - self.start()
    }
}

/// A classified interval for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(rename = "type")]
    pub interval_type: IntervalType,
}

impl Interval {
    /// Create an interval, rejecting empty or inverted spans
    pub fn new(start: Timestamp, end: Timestamp, interval_type: IntervalType) -> Result<Self> {
        check_span(start, end)?;
        Ok(Self {
            start,
            end,
            interval_type,
        })
    }

    /// Create from closed notation, where `last` is the final second inside the interval
    pub fn closed(first: Timestamp, last: Timestamp, interval_type: IntervalType) -> Result<Self> {
        Self::new(first, last + Duration::seconds(1), interval_type)
    }

    /// The final second inside the interval, in closed notation
    pub fn last_second(&self) -> Timestamp {
        self.end - Duration::seconds(1)
    }

    /// Lift into the counted form without a count
    pub fn uncounted(&self) -> IntervalWithCount {
        IntervalWithCount {
            start: self.start,
            end: self.end,
            interval_type: self.interval_type,
            count: None,
        }
    }
}

impl TimeRange for Interval {
    fn start(&self) -> Timestamp {
        self.start
    }

    fn end(&self) -> Timestamp {
        self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) {}",
            self.start.to_rfc3339(),
            self.end.to_rfc3339(),
            self.interval_type
        )
    }
}

/// A classified interval carrying a compliance weight
///
/// `count` is `None` for intervals that never went through a counting
/// combinator, or that were passed through one unweighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalWithCount {
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(rename = "type")]
    pub interval_type: IntervalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
}

impl IntervalWithCount {
    /// Create a counted interval, rejecting empty or inverted spans
    pub fn new(
        start: Timestamp,
        end: Timestamp,
        interval_type: IntervalType,
        count: Option<f64>,
    ) -> Result<Self> {
        check_span(start, end)?;
        Ok(Self {
            start,
            end,
            interval_type,
            count,
        })
    }

    /// The count, with a missing count read as zero
    pub fn count_or_zero(&self) -> f64 {
        self.count.unwrap_or(0.0)
    }

    /// Whether two intervals carry the same `(type, count)` payload
    pub fn same_value(&self, other: &IntervalWithCount) -> bool {
        self.interval_type == other.interval_type && self.count == other.count
    }

    /// Drop the count
    pub fn to_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
            interval_type: self.interval_type,
        }
    }
}

impl From<Interval> for IntervalWithCount {
    fn from(interval: Interval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            interval_type: interval.interval_type,
            count: None,
        }
    }
}

impl TimeRange for IntervalWithCount {
    fn start(&self) -> Timestamp {
        self.start
    }

    fn end(&self) -> Timestamp {
        self.end
    }
}

impl fmt::Display for IntervalWithCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) {}",
            self.start.to_rfc3339(),
            self.end.to_rfc3339(),
            self.interval_type
        )?;
        if let Some(count) = self.count {
            write!(f, " count={}", count)?;
        }
        Ok(())
    }
}

/// The outer `[start, end)` window all partitions of one evaluation cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ObservationWindow {
    /// Create a window, rejecting empty or inverted spans
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start >= end {
            return Err(DigipodError::input(
                DGP0005,
                format!(
                    "window start {} is not before end {}",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                ),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from RFC 3339 strings (any offset)
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Intersect `[start, end)` with the window; `None` when they do not overlap
    pub fn clip(&self, start: Timestamp, end: Timestamp) -> Option<(Timestamp, Timestamp)> {
        let lo = start.max(self.start);
        let hi = end.min(self.end);
        (lo < hi).then_some((lo, hi))
    }
}

impl TimeRange for ObservationWindow {
    fn start(&self) -> Timestamp {
        self.start
    }

    fn end(&self) -> Timestamp {
        self.end
    }
}

/// Parse an RFC 3339 timestamp with any offset, normalised to UTC
pub fn parse_timestamp(value: &str) -> Result<Timestamp> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            DigipodError::input(
                digipod_diagnostics::DGP0001,
                format!("invalid timestamp '{}': {}", value, e),
            )
        })
}

fn check_span(start: Timestamp, end: Timestamp) -> Result<()> {
    if start >= end {
        return Err(DigipodError::data(
            DGP0203,
            format!(
                "interval [{}, {}) is empty",
                start.to_rfc3339(),
                end.to_rfc3339()
            ),
        ));
    }
    Ok(())
}
