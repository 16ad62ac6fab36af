/// Calendar arithmetic used by the field expander and the search engine.
use crate::field::FieldValue;

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month, or `None` if the month doesn't exist.
pub(crate) fn days_in_month(year: i32, month: FieldValue) -> Option<FieldValue> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// Returns `true` if the date exists in the proleptic Gregorian calendar.
#[inline]
pub(crate) fn is_valid_date(year: i32, month: FieldValue, day: FieldValue) -> bool {
    day >= 1 && days_in_month(year, month).is_some_and(|last| day <= last)
}

/// Calculates ISO day of week (Monday = 1 ... Sunday = 7) for specified date.
///
/// Returns `None` for dates which don't exist.
pub(crate) fn iso_weekday(year: i32, month: FieldValue, day: FieldValue) -> Option<FieldValue> {
    if !is_valid_date(year, month, day) {
        return None;
    }

    // Sakamoto's method, gives Sunday = 0.
    const OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let year = if month < 3 { year as i64 - 1 } else { year as i64 };
    let dow = (year + year.div_euclid(4) - year.div_euclid(100)
        + year.div_euclid(400)
        + OFFSETS[(month - 1) as usize]
        + day as i64)
        .rem_euclid(7);

    Some(if dow == 0 { 7 } else { dow as FieldValue })
}
