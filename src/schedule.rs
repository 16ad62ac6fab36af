use crate::{
    field::{Field, FieldKind, FieldValue},
    grammar::RawFields,
    search::{ForwardSearch, NextRun, NoMatch, SearchHorizon},
    Error, ReferenceInstant, Result,
};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use std::{fmt::Display, str::FromStr};
use tracing::debug;

/// Represents a crontab schedule with its methods.
///
/// For schedule format clarification and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Schedule {
    minute: Field,
    hour: Field,
    day: Field,
    month: Field,
    weekday: Field,
}

impl Schedule {
    /// Parses and validates provided crontab `line` and constructs [`Schedule`] instance.
    ///
    /// Text after the fifth field (the command, usually) is ignored.
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`Error`] in a case provided line is unparsable or has format errors.
    pub fn new(line: impl AsRef<str>) -> Result<Self> {
        let line = line.as_ref();
        let Some(fields) = RawFields::split(line) else {
            debug!(line, "line doesn't match crontab grammar");
            return Err(Error::InvalidSchedule(line.to_owned()));
        };

        Ok(Self {
            minute: Field::parse(FieldKind::Minute, fields.minute)?,
            hour: Field::parse(FieldKind::Hour, fields.hour)?,
            day: Field::parse(FieldKind::DayOfMonth, fields.day)?,
            month: Field::parse(FieldKind::Month, fields.month)?,
            weekday: Field::parse(FieldKind::Weekday, fields.weekday)?,
        })
    }

    /// Returns time of the next run strictly after the `reference` minute,
    /// searching the reference year and the following one.
    #[inline]
    pub fn next_run(&self, reference: &ReferenceInstant) -> NextRun {
        self.next_run_within(reference, SearchHorizon::default())
    }

    /// Returns time of the next run strictly after the `reference` minute within the provided `horizon`.
    pub fn next_run_within(&self, reference: &ReferenceInstant, horizon: SearchHorizon) -> NextRun {
        ForwardSearch::new(self, *reference, horizon).run()
    }

    /// Returns time of the next run after the `current` one in the timezone of `current`.
    ///
    /// Returns `None` if there is no run within the default horizon
    /// or the found local time doesn't exist in that timezone.
    pub fn upcoming<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.next_run(&ReferenceInstant::from_datetime(current))
            .to_timezone(&current.timezone())
    }

    /// Returns iterator of runs after the `reference` minute,
    /// each run is searched within the default horizon from the previous one.
    #[inline]
    pub fn iter(&self, reference: &ReferenceInstant) -> impl Iterator<Item = NaiveDateTime> {
        let next = self.next_run(reference).at();
        ScheduleIterator {
            schedule: self.clone(),
            next,
        }
    }

    /// Returns sorted set of the values of the field `kind`.
    ///
    /// `year` and `month` are used to calculate the days of month only.
    /// Out of domain bare values are kept as is.
    pub fn expand(&self, kind: FieldKind, year: i32, month: FieldValue) -> Vec<FieldValue> {
        let field = match kind {
            FieldKind::Minute => &self.minute,
            FieldKind::Hour => &self.hour,
            FieldKind::DayOfMonth => &self.day,
            FieldKind::Month => &self.month,
            FieldKind::Weekday => &self.weekday,
        };
        field.values(year, month)
    }
}

/// Calculates next run of the crontab `line` after the `reference` minute.
///
/// Never fails: unparsable line results in [`NoMatch::Malformed`].
pub fn next_run(line: &str, reference: &ReferenceInstant) -> NextRun {
    match Schedule::new(line) {
        Ok(schedule) => schedule.next_run(reference),
        Err(_) => NoMatch::Malformed.into(),
    }
}

/// Contains iterator state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct ScheduleIterator {
    schedule: Schedule,
    next: Option<NaiveDateTime>,
}

impl Iterator for ScheduleIterator {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.schedule.next_run(&ReferenceInstant::from_naive(&current)).at();
        Some(current)
    }
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = Error;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day, self.month, self.weekday
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use rstest::rstest;
    use std::time::Duration;

    fn reference(s: &str) -> ReferenceInstant {
        ReferenceInstant::from_naive(&NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
    }

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[rstest]
    #[case("* * * * *", "* * * * *")]
    #[case("45 10 * * 1", "45 10 * * 1")]
    #[case("  */15  10-14/2 1,15   1-6 0,7  ", "*/15 10-14/2 1,15 1-6 0,7")]
    #[case("0 0 1 1 0 /usr/bin/backup --full", "0 0 1 1 0")]
    #[case("99 99 99 99 99", "99 99 99 99 99")]
    fn parse_and_display(#[case] line: &str, #[case] expected: &str) {
        let schedule = Schedule::new(line);
        assert!(schedule.is_ok(), "line = {line:?}, error = {}", schedule.err().unwrap());
        let schedule = schedule.unwrap();

        assert_eq!(schedule.to_string(), expected);
        assert_eq!(String::from(&schedule), expected);
        assert_eq!(Schedule::from_str(expected).unwrap(), schedule);
    }

    #[rstest]
    #[case("not a cron line", Error::InvalidSchedule("not a cron line".to_owned()))]
    #[case("", Error::InvalidSchedule("".to_owned()))]
    #[case("* * * *", Error::InvalidSchedule("* * * *".to_owned()))]
    #[case("@daily", Error::InvalidSchedule("@daily".to_owned()))]
    #[case("0 0 * jan mon", Error::InvalidSchedule("0 0 * jan mon".to_owned()))]
    #[case("*/0 * * * *", Error::InvalidCell { field: FieldKind::Minute, cell: "*/0".to_owned() })]
    #[case("* * 1-5/0 * *", Error::InvalidCell { field: FieldKind::DayOfMonth, cell: "1-5/0".to_owned() })]
    fn parse_errors(#[case] line: &str, #[case] expected: Error) {
        assert_eq!(Schedule::new(line), Err(expected));
    }

    #[test]
    fn conversions() {
        let line = "*/5 * * * 1-5";
        let expected = Schedule::new(line).unwrap();

        assert_eq!(Schedule::try_from(line).unwrap(), expected);
        assert_eq!(Schedule::try_from(line.to_owned()).unwrap(), expected);
        assert_eq!(Schedule::try_from(&line.to_owned()).unwrap(), expected);
        assert_eq!(line.parse::<Schedule>().unwrap(), expected);
        assert_eq!(String::from(expected), line);
    }

    #[rstest]
    #[case(FieldKind::Minute, "*/15 * * * *", 2024, 1, vec![0, 15, 30, 45])]
    #[case(FieldKind::Minute, "* * * * *", 2024, 1, (0..=59).collect())]
    #[case(FieldKind::Minute, "99,5 * * * *", 2024, 1, vec![5, 99])]
    #[case(FieldKind::Hour, "* 10-14 * * *", 2024, 1, vec![10, 11, 12, 13, 14])]
    #[case(FieldKind::Hour, "* 10-14/2 * * *", 2024, 1, vec![10, 12, 14])]
    #[case(FieldKind::Hour, "* * * * *", 2024, 1, (0..=23).collect())]
    #[case(FieldKind::DayOfMonth, "* * 28-31 * *", 2024, 2, vec![28, 29])]
    #[case(FieldKind::DayOfMonth, "* * 28-31 * *", 2023, 2, vec![28])]
    #[case(FieldKind::Month, "* * * * *", 2024, 1, (1..=12).collect())]
    #[case(FieldKind::Weekday, "* * * * 0,7", 2024, 1, vec![0, 7])]
    fn expand_fields(
        #[case] kind: FieldKind,
        #[case] line: &str,
        #[case] year: i32,
        #[case] month: FieldValue,
        #[case] expected: Vec<FieldValue>,
    ) {
        assert_eq!(Schedule::new(line).unwrap().expand(kind, year, month), expected);
    }

    #[rstest]
    #[case("45 10 * * 1", "2024-03-04 10:30", NextRun::At(naive("2024-03-04 10:45")))]
    #[case("45 10 * * 1", "2024-03-04 10:50", NextRun::At(naive("2024-03-11 10:45")))]
    #[case("0 0 1 1 0", "2024-03-04 10:30", NextRun::NoMatch(NoMatch::Exhausted))]
    #[case("0 0 1 1 7", "2024-03-04 10:30", NextRun::NoMatch(NoMatch::Exhausted))]
    #[case("0 0 1 1 3", "2024-03-04 10:30", NextRun::At(naive("2025-01-01 00:00")))]
    #[case("not a cron line", "2024-03-04 10:30", NextRun::NoMatch(NoMatch::Malformed))]
    #[case("*/0 * * * *", "2024-03-04 10:30", NextRun::NoMatch(NoMatch::Malformed))]
    #[timeout(Duration::from_secs(1))]
    fn lenient_next_run(#[case] line: &str, #[case] reference_at: &str, #[case] expected: NextRun) {
        assert_eq!(next_run(line, &reference(reference_at)), expected, "line = {line}");
    }

    #[test]
    fn upcoming_keeps_timezone() {
        let schedule = Schedule::new("45 10 * * 1").unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let current = tz.with_ymd_and_hms(2024, 3, 4, 10, 30, 15).unwrap();

        let next = schedule.upcoming(&current).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-03-04T10:45:00+02:00");

        let current = tz.with_ymd_and_hms(2024, 3, 4, 10, 45, 0).unwrap();
        let next = schedule.upcoming(&current).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-03-11T10:45:00+02:00");
    }

    #[test]
    fn upcoming_without_match() {
        let schedule = Schedule::new("0 0 * * 0").unwrap();
        let current = chrono::Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap();
        assert_eq!(schedule.upcoming(&current), None);
    }

    #[rstest]
    #[case("*/20 * * * *", "2024-03-04 10:30", vec!["2024-03-04 10:40", "2024-03-04 11:00", "2024-03-04 11:20"])]
    #[case("45 10 * * 1", "2024-03-04 10:30", vec!["2024-03-04 10:45", "2024-03-11 10:45", "2024-03-18 10:45"])]
    #[case("30 12 * * *", "2024-12-30 13:00", vec!["2024-12-31 12:30", "2025-01-01 12:30", "2025-01-02 12:30"])]
    #[timeout(Duration::from_secs(1))]
    fn iterator(#[case] line: &str, #[case] reference_at: &str, #[case] expected: Vec<&str>) {
        let schedule = Schedule::new(line).unwrap();
        let runs = schedule.iter(&reference(reference_at)).take(3).collect::<Vec<_>>();
        let expected = expected.into_iter().map(naive).collect::<Vec<_>>();

        assert_eq!(runs, expected);
    }

    #[test]
    fn iterator_stops_when_exhausted() {
        let schedule = Schedule::new("0 0 29 2 *").unwrap();
        let runs = schedule.iter(&reference("2023-01-01 00:00")).take(5).collect::<Vec<_>>();

        assert_eq!(
            runs,
            vec![NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(0, 0, 0).unwrap()]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_as_string() {
        let schedule = Schedule::new("*/15 10-14/2 * * 1-5").unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#""*/15 10-14/2 * * 1-5""#);
        assert_eq!(serde_json::from_str::<Schedule>(&json).unwrap(), schedule);
        assert!(serde_json::from_str::<Schedule>(r#""not a cron line""#).is_err());

        let horizon = serde_json::from_str::<SearchHorizon>("3").unwrap();
        assert_eq!(horizon.years(), 3);
        assert!(serde_json::from_str::<SearchHorizon>("0").is_err());
    }
}
