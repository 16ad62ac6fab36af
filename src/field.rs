use crate::{calendar, series::SeriesWithStep, Error, Result};
use std::{collections::BTreeSet, fmt::Display};
use tracing::debug;

/// Type of a single expanded field value.
pub type FieldValue = u32;

/// One of the five schedule positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// Minutes, `0-59`.
    Minute,
    /// Hours, `0-23`.
    Hour,
    /// Day of month, `1` up to the number of days in the particular month.
    DayOfMonth,
    /// Months, `1-12`.
    Month,
    /// Day of week, `0-7`.
    Weekday,
}

impl FieldKind {
    /// Returns inclusive `(low, high)` bounds of the field.
    ///
    /// `year` and `month` are used by [`FieldKind::DayOfMonth`] only,
    /// its upper bound is `0` (empty domain) if `month` doesn't exist.
    pub fn domain(&self, year: i32, month: FieldValue) -> (FieldValue, FieldValue) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, calendar::days_in_month(year, month).unwrap_or(0)),
            Self::Month => (1, 12),
            Self::Weekday => (0, 7),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day of month",
            Self::Month => "month",
            Self::Weekday => "day of week",
        };
        write!(f, "{name}")
    }
}

/// Single comma-separated entry of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    /// `*` or `*/step`: the whole domain.
    All {
        /// Optional step, `1` if absent.
        step: Option<FieldValue>,
    },
    /// `from-to` or `from-to/step`: the range clamped to the domain.
    Range {
        /// First value, raised to the domain's low bound if below it.
        from: FieldValue,
        /// Last value, lowered to the domain's high bound if above it.
        to: FieldValue,
        /// Optional step, `1` if absent.
        step: Option<FieldValue>,
    },
    /// Bare value, passed through as is, even if it's out of the domain.
    Value(FieldValue),
}

impl Cell {
    /// Parses a single cell.
    ///
    /// Returns `None` if the text is not one of the known cell forms or the step is zero.
    pub fn parse(input: &str) -> Option<Self> {
        let (base, step) = match input.split_once('/') {
            Some((base, step)) => (base, Some(parse_number(step).filter(|step| *step > 0)?)),
            None => (input, None),
        };

        if base == "*" {
            Some(Self::All { step })
        } else if let Some((from, to)) = base.split_once('-') {
            Some(Self::Range {
                from: parse_number(from)?,
                to: parse_number(to)?,
                step,
            })
        } else if step.is_none() {
            parse_number(base).map(Self::Value)
        } else {
            None
        }
    }

    /// Expands the cell into the values it denotes within the `[low, high]` domain.
    pub fn expand(&self, low: FieldValue, high: FieldValue) -> Vec<FieldValue> {
        let (start, end, step) = match *self {
            Self::Value(value) => return vec![value],
            Self::All { step } => (low, high, step),
            Self::Range { from, to, step } => (from.max(low), to.min(high), step),
        };

        SeriesWithStep::new(start, end, step.unwrap_or(1))
            .map(|series| series.collect())
            .unwrap_or_default()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All { step: None } => write!(f, "*"),
            Self::All { step: Some(step) } => write!(f, "*/{step}"),
            Self::Range { from, to, step: None } => write!(f, "{from}-{to}"),
            Self::Range {
                from,
                to,
                step: Some(step),
            } => write!(f, "{from}-{to}/{step}"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Expands comma-separated list of cells into the values it denotes within the `[low, high]` domain.
///
/// Unrecognized cells contribute nothing.
/// The result keeps the order of cells and may contain duplicates.
pub fn expand(cells: &str, low: FieldValue, high: FieldValue) -> Vec<FieldValue> {
    cells
        .split(',')
        .filter_map(Cell::parse)
        .flat_map(|cell| cell.expand(low, high))
        .collect()
}

/// Parsed schedule field: its kind and list of cells.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Field {
    kind: FieldKind,
    cells: Vec<Cell>,
}

impl Field {
    /// Parses comma-separated list of cells, every cell should be valid.
    pub(crate) fn parse(kind: FieldKind, input: &str) -> Result<Self> {
        let cells = input
            .split(',')
            .map(|cell| {
                Cell::parse(cell).ok_or_else(|| {
                    debug!(field = %kind, cell, "unable to parse cell");
                    Error::InvalidCell {
                        field: kind,
                        cell: cell.to_owned(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { kind, cells })
    }

    /// Returns sorted and deduplicated set of the field values.
    ///
    /// `year` and `month` matter for the day of month field only.
    pub(crate) fn values(&self, year: i32, month: FieldValue) -> Vec<FieldValue> {
        let (low, high) = self.kind.domain(year, month);
        self.cells
            .iter()
            .flat_map(|cell| cell.expand(low, high))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self.cells.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",");
        write!(f, "{cells}")
    }
}

/// Converts string of ASCII digits into a number.
fn parse_number(input: &str) -> Option<FieldValue> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        input.parse().ok()
    }
}
