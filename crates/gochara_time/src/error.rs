//! Error types for calendar conversions.

use thiserror::Error;

/// Errors from parsing or validating calendar dates.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Input text is not a recognised date/time.
    #[error("invalid date/time format: {0}")]
    Parse(String),
    /// A calendar field is outside its valid range.
    #[error("date/time field out of range: {0}")]
    OutOfRange(&'static str),
}
