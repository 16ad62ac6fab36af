use crate::{
    calendar,
    field::{FieldKind, FieldValue},
    Error, ReferenceInstant, Result, Schedule,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt::Display;
use tracing::{debug, trace};

/// Number of calendar years searched for the next run, starting from the reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct SearchHorizon {
    years: u16,
}

impl SearchHorizon {
    /// The reference year and the following one.
    pub const DEFAULT_YEARS: u16 = 2;

    /// Constructs horizon of `years` calendar years, at least one is required.
    pub fn new(years: u16) -> Result<Self> {
        if years == 0 {
            Err(Error::InvalidHorizon(years))
        } else {
            Ok(Self { years })
        }
    }

    /// Number of calendar years in the horizon.
    #[inline]
    pub fn years(&self) -> u16 {
        self.years
    }
}

impl Default for SearchHorizon {
    fn default() -> Self {
        Self {
            years: Self::DEFAULT_YEARS,
        }
    }
}

impl TryFrom<u16> for SearchHorizon {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SearchHorizon> for u16 {
    fn from(value: SearchHorizon) -> Self {
        value.years
    }
}

/// Reason why there is no next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoMatch {
    /// The schedule line can't be parsed.
    Malformed,
    /// Nothing within the search horizon satisfies the schedule.
    Exhausted,
}

/// Result of the next run calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NextRun {
    /// Local calendar date and time of the next run.
    At(NaiveDateTime),
    /// The schedule never fires within the horizon.
    NoMatch(NoMatch),
}

impl NextRun {
    /// Returns `true` if the next run was found.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Calendar date and time of the next run, if any.
    #[inline]
    pub fn at(&self) -> Option<NaiveDateTime> {
        match self {
            Self::At(at) => Some(*at),
            Self::NoMatch(_) => None,
        }
    }

    /// Resolves the next run in the timezone `tz`.
    ///
    /// Ambiguous local time resolves to the earliest instant,
    /// `None` is returned if there is no next run or the local time doesn't exist in `tz`.
    pub fn to_timezone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.from_local_datetime(&self.at()?).earliest()
    }

    /// Seconds since the Unix epoch of the next run resolved in the timezone `tz`.
    pub fn timestamp_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<i64> {
        self.to_timezone(tz).map(|at| at.timestamp())
    }
}

impl From<NoMatch> for NextRun {
    fn from(value: NoMatch) -> Self {
        Self::NoMatch(value)
    }
}

impl Display for NextRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::At(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M")),
            Self::NoMatch(NoMatch::Malformed) => write!(f, "no match: malformed schedule"),
            Self::NoMatch(NoMatch::Exhausted) => write!(f, "no match"),
        }
    }
}

/// Earliest-match search over ascending calendar candidates.
#[derive(Debug, Clone)]
pub(crate) struct ForwardSearch<'a> {
    schedule: &'a Schedule,
    reference: ReferenceInstant,
    horizon: SearchHorizon,
    minutes: Vec<FieldValue>,
    hours: Vec<FieldValue>,
    months: Vec<FieldValue>,
    weekdays: Vec<FieldValue>,
}

impl<'a> ForwardSearch<'a> {
    pub(crate) fn new(schedule: &'a Schedule, reference: ReferenceInstant, horizon: SearchHorizon) -> Self {
        let (year, month) = (reference.year(), reference.month());
        // Out of domain time values can't form a real instant.
        let within_domain = |kind: FieldKind| {
            let (_low, high) = kind.domain(year, month);
            let mut values = schedule.expand(kind, year, month);
            values.retain(|v| *v <= high);
            values
        };

        Self {
            schedule,
            reference,
            horizon,
            minutes: within_domain(FieldKind::Minute),
            hours: within_domain(FieldKind::Hour),
            months: schedule.expand(FieldKind::Month, year, month),
            weekdays: schedule.expand(FieldKind::Weekday, year, month),
        }
    }

    /// Returns the first candidate which has a suitable time of the day.
    pub(crate) fn run(&self) -> NextRun {
        let next = self.dates().find_map(|date| {
            let (hour, minute) = self.time_of(&date)?;
            date.and_hms_opt(hour, minute, 0)
        });

        match next {
            Some(at) => {
                debug!(reference = %self.reference, %at, "next run found");
                NextRun::At(at)
            }
            None => {
                debug!(reference = %self.reference, years = self.horizon.years(), "no run within horizon");
                NoMatch::Exhausted.into()
            }
        }
    }

    /// Ascending sequence of dates matching month, day of month and day of week fields.
    pub(crate) fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first_year = self.reference.year();

        (0..i32::from(self.horizon.years()))
            .filter_map(move |offset| first_year.checked_add(offset))
            .flat_map(move |year| self.months.iter().map(move |month| (year, *month)))
            .flat_map(move |(year, month)| {
                self.schedule
                    .expand(FieldKind::DayOfMonth, year, month)
                    .into_iter()
                    .map(move |day| (year, month, day))
            })
            .filter(move |(year, month, day)| {
                calendar::iso_weekday(*year, *month, *day).is_some_and(|weekday| self.weekdays.contains(&weekday))
            })
            .filter_map(|(year, month, day)| {
                trace!(year, month, day, "candidate date");
                NaiveDate::from_ymd_opt(year, month, day)
            })
    }

    /// Picks hour and minute for the matched date relative to the reference instant.
    ///
    /// Returns `None` if the date can't be a forward candidate.
    fn time_of(&self, date: &NaiveDate) -> Option<(FieldValue, FieldValue)> {
        use chrono::Datelike;
        use std::cmp::Ordering;

        let reference = &self.reference;
        match date.year().cmp(&reference.year()) {
            Ordering::Less => None,
            Ordering::Greater => self.first_time(),
            Ordering::Equal => {
                if date.month() == reference.month() && date.day() == reference.day() {
                    self.later_time()
                } else if date.month() == reference.month() && date.day() > reference.day() {
                    self.first_time()
                } else if date.month() > reference.month() {
                    self.later_time()
                } else {
                    None
                }
            }
        }
    }

    /// The first hour with the first minute.
    fn first_time(&self) -> Option<(FieldValue, FieldValue)> {
        Some((*self.hours.first()?, *self.minutes.first()?))
    }

    /// The minute after the reference one in the reference hour,
    /// or the first minute of the first hour after the reference one.
    fn later_time(&self) -> Option<(FieldValue, FieldValue)> {
        let (hour, minute) = (self.reference.hour(), self.reference.minute());

        if self.hours.contains(&hour) {
            if let Some(next_minute) = self.minutes.iter().find(|m| **m > minute) {
                return Some((hour, *next_minute));
            }
        }

        let next_hour = self.hours.iter().find(|h| **h > hour)?;
        Some((*next_hour, *self.minutes.first()?))
    }
}
