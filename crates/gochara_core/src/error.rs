//! Error types for ephemeris lookups.

use thiserror::Error;

use crate::body::Body;

/// Errors raised by an ephemeris provider or chart builder.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    /// The provider carries no data for this body.
    #[error("body not available from this provider: {0}")]
    UnsupportedBody(Body),
    /// The requested epoch lies outside the provider's coverage.
    #[error("epoch out of range for {body}: JD {epoch_jd}")]
    EpochOutOfRange { body: Body, epoch_jd: f64 },
    /// Ephemeris data failed to parse or is inconsistent.
    #[error("ephemeris data error: {0}")]
    Data(String),
    /// I/O error while loading ephemeris data.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EphemerisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EphemerisError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}
