use crate::field::FieldValue;
use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use std::fmt::Display;

/// The pinned "now" which next runs are calculated against.
///
/// Always truncated to the start of the minute: seconds and fractions are dropped.
/// Components are interpreted in the local calendar of whatever timezone the instant was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "NaiveDateTime"))]
pub struct ReferenceInstant(NaiveDateTime);

impl ReferenceInstant {
    /// Captures current wall clock time of the host in its local timezone.
    #[cfg(feature = "clock")]
    pub fn capture() -> Self {
        Self::from_datetime(&chrono::Local::now())
    }

    /// Takes local calendar components of the `instant` in its own timezone.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive(&instant.naive_local())
    }

    /// Takes calendar components of the `instant` as is.
    pub fn from_naive(instant: &NaiveDateTime) -> Self {
        let truncated = *instant
            - TimeDelta::seconds(instant.second() as i64)
            - TimeDelta::nanoseconds(instant.nanosecond() as i64);
        Self(truncated)
    }

    /// Reference instant as a calendar date and time.
    #[inline]
    pub fn to_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar year.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month, `1-12`.
    #[inline]
    pub fn month(&self) -> FieldValue {
        self.0.month()
    }

    /// Day of month, starting from `1`.
    #[inline]
    pub fn day(&self) -> FieldValue {
        self.0.day()
    }

    /// Hour, `0-23`.
    #[inline]
    pub fn hour(&self) -> FieldValue {
        self.0.hour()
    }

    /// Minute, `0-59`.
    #[inline]
    pub fn minute(&self) -> FieldValue {
        self.0.minute()
    }

    /// ISO day of week: Monday is `1`, Sunday is `7`.
    #[inline]
    pub fn weekday(&self) -> FieldValue {
        self.0.weekday().number_from_monday()
    }
}

impl From<NaiveDateTime> for ReferenceInstant {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_naive(&value)
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for ReferenceInstant {
    fn from(value: &DateTime<Tz>) -> Self {
        Self::from_datetime(value)
    }
}

impl Display for ReferenceInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
