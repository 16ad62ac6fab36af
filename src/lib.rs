//! Crontab line parser and next-run calculator.
#![deny(unsafe_code, missing_docs)]

//! This is a tiny crate, intended to:
//! - parse the schedule part of a classic five-field crontab line;
//! - calculate the next moment the schedule fires, relative to a pinned reference instant.
//!
//! _This is not a cron jobs scheduler or runner._ Job execution, persistence and daemonization
//! are left to the caller.
//!
//! ## Schedule format
//!
//! A line consists of five whitespace-separated fields followed by optional text (usually the command),
//! which is ignored:
//!
//! | Field        | Allowed values                 | Allowed special characters |
//! |--------------|--------------------------------|----------------------------|
//! | Minutes      | 0-59                           | * , - /                    |
//! | Hours        | 0-23                           | * , - /                    |
//! | Day of Month | 1-28/29/30/31 (month-specific) | * , - /                    |
//! | Month        | 1-12                           | * , - /                    |
//! | Day of Week  | 0-7                            | * , - /                    |
//!
//! Every field is a comma-separated list of cells:
//! - `*` - each possible value of the field;
//! - `*/N` - each N-th value of the field starting from its minimum, i.e. `*/15` means `0,15,30,45` for minutes;
//! - `A-B` - range of values, silently clamped to the field bounds;
//! - `A-B/N` - each N-th value of the range, i.e. `10-14/2` means `10,12,14`;
//! - `N` - a particular value, used as is even if it's out of the field bounds.
//!
//! Names of months and days, `@daily`-like aliases and seconds aren't supported.
//!
//! ### Matching rules
//! - A date should match both day of month and day of week fields (not one of them, as in the classic cron).
//! - Day of week is matched against ISO numbering: Monday is `1`, ..., Sunday is `7`.
//!   So `7` means Sunday, while `0` never matches any date.
//! - The next run is strictly after the reference minute: a schedule firing exactly at the reference
//!   minute is considered as already fired.
//! - Search is limited by a [`SearchHorizon`]: the reference year and the following one by default.
//!
//! ## How to use
//!
//! Use [`Schedule::new`] to parse a line and [`Schedule::next_run`] to calculate the next run,
//! or the lenient [`next_run`] function which never fails and reports unparsable lines as
//! [`NoMatch::Malformed`].
//! To evaluate many schedules against the same "now", use a [`Calculator`] session.
//!
//! ### Example with `Schedule`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_next::{NextRun, ReferenceInstant, Result, Schedule};
//!
//! fn next() -> Result<()> {
//!     let schedule = Schedule::new("45 10 * * 1 /usr/bin/report")?;
//!     let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(10, 50, 0).unwrap();
//!
//!     let next = schedule.next_run(&ReferenceInstant::from_naive(&now));
//!     let expected = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap().and_hms_opt(10, 45, 0).unwrap();
//!     assert_eq!(next, NextRun::At(expected));
//!
//!     Ok(())
//! }
//! # next().unwrap();
//! ```
//!
//! ### Example with `Calculator`
//! ```rust
//! use cron_next::{Calculator, NoMatch, NextRun};
//!
//! let calculator = Calculator::new();
//!
//! assert!(calculator.next_run("*/5 * * * *").is_match());
//! assert_eq!(calculator.next_run("0 0 1 1 0"), NextRun::NoMatch(NoMatch::Exhausted));
//! assert_eq!(calculator.next_run("not a cron line"), NextRun::NoMatch(NoMatch::Malformed));
//! ```
//!
//! # Feature flags
//! * `clock` (default): enables capturing of the host wall clock by [`ReferenceInstant::capture`] and [`Calculator::new`].
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and
//!   [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementations for the public types.

mod calendar;
/// Session object with a pinned reference instant.
pub mod calculator;
/// Crate specific Error implementation.
pub mod error;
/// Schedule field cells and their expansion.
pub mod field;
mod grammar;
/// Pinned "now" of calculations.
pub mod reference;
/// Crontab schedule parser and next run calculation.
pub mod schedule;
/// Next run search and its result.
pub mod search;
mod series;

// Re-export of public entities.
pub use calculator::Calculator;
pub use error::Error;
pub use field::{expand, Cell, FieldKind, FieldValue};
pub use reference::ReferenceInstant;
pub use schedule::{next_run, Schedule};
pub use search::{NextRun, NoMatch, SearchHorizon};

/// Convenient alias for `Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
