//! # Time Ranges
//!
//! Half-open time-of-day intervals `[start, end)` within a single day, and
//! the interval arithmetic availability is built on.
//!
//! Two ranges overlap iff `a.start < b.end && b.start < a.end`, so ranges that
//! merely touch (`a.end == b.start`) do not overlap.

use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{BookingError, BookingResult};

pub const SECONDS_PER_DAY: u32 = 86_400;

/// A time of day with second precision.
///
/// Stored as seconds since midnight. `24:00:00` is a valid value so that a
/// range can run up to the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(SECONDS_PER_DAY);

    pub fn from_seconds(seconds: u32) -> BookingResult<Self> {
        if seconds > SECONDS_PER_DAY {
            return Err(BookingError::InvalidRange(format!(
                "{seconds} seconds is past the end of the day"
            )));
        }
        Ok(Self(seconds))
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> BookingResult<Self> {
        if minute >= 60 || second >= 60 {
            return Err(BookingError::InvalidRange(format!(
                "{hour:02}:{minute:02}:{second:02} is not a time of day"
            )));
        }
        Self::from_seconds(hour * 3600 + minute * 60 + second)
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Moves forward by `minutes`, or `None` if that runs past `24:00:00`.
    pub fn add_minutes(self, minutes: u32) -> Option<Self> {
        let seconds = self.0.checked_add(minutes.checked_mul(60)?)?;
        (seconds <= SECONDS_PER_DAY).then_some(Self(seconds))
    }

    /// `None` for `24:00:00`, which chrono cannot represent.
    pub fn to_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_num_seconds_from_midnight_opt(self.0, 0)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    /// Accepts `HH:MM` or `HH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidRange(format!("'{s}' is not a time of day"));

        let parts = s
            .trim()
            .split(':')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [hour, minute] => Self::from_hms(*hour, *minute, 0),
            [hour, minute, second] => Self::from_hms(*hour, *minute, *second),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = BookingError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> BookingResult<Self> {
        if start >= end {
            return Err(BookingError::InvalidRange(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_seconds(&self) -> u32 {
        self.end.0 - self.start.0
    }

    /// Whole minutes; a trailing partial minute is dropped.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_seconds() / 60
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Like [`TimeRange::overlaps`], but adjacent ranges count too.
    pub fn touches_or_overlaps(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, inner: &TimeRange) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    /// Maximal sub-intervals of `self` not overlapping any of `removals`,
    /// in chronological order.
    pub fn subtract(&self, removals: &[TimeRange]) -> Vec<TimeRange> {
        let mut remaining = Vec::new();
        let mut cursor = self.start;

        for removal in Self::merge(removals) {
            if removal.end <= cursor {
                continue;
            }
            if removal.start >= self.end {
                break;
            }
            if removal.start > cursor {
                remaining.push(TimeRange {
                    start: cursor,
                    end: removal.start,
                });
            }
            cursor = removal.end;
            if cursor >= self.end {
                break;
            }
        }

        if cursor < self.end {
            remaining.push(TimeRange {
                start: cursor,
                end: self.end,
            });
        }

        remaining
    }

    /// Sorts by start and coalesces ranges that overlap or touch.
    pub fn merge(ranges: &[TimeRange]) -> Vec<TimeRange> {
        let mut sorted = ranges.to_vec();
        sorted.sort();

        let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if last.touches_or_overlaps(&range) => {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        merged
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for TimeRange {
    type Err = BookingError;

    /// Parses `start-end`, e.g. `09:00-10:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| BookingError::InvalidRange(format!("'{s}' is not a time range")))?;
        Self::new(start.parse()?, end.parse()?)
    }
}
