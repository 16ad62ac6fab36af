use crate::field::FieldKind;
use thiserror::Error;

/// Crate specific Errors implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Error {
    /// The line doesn't have the shape of five crontab fields.
    #[error("invalid schedule: {0:?}")]
    InvalidSchedule(String),
    /// Single cell of a field can't be interpreted.
    #[error("invalid {field} cell: {cell:?}")]
    InvalidCell {
        /// Field containing the cell.
        field: FieldKind,
        /// Raw text of the cell.
        cell: String,
    },
    /// Search horizon should contain at least one year.
    #[error("invalid search horizon: {0} years")]
    InvalidHorizon(u16),
}
