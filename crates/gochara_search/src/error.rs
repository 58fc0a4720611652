//! Error types for transit and return searches.

use gochara_core::EphemerisError;
use thiserror::Error;

/// Errors from search operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Ephemeris provider failure; aborts the scan.
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
    /// Search configuration rejected before any sampling.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Caller-supplied input rejected before any sampling.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The cancellation flag was raised mid-scan.
    #[error("search cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::Body;

    #[test]
    fn ephemeris_errors_convert() {
        let err: SearchError = EphemerisError::UnsupportedBody(Body::Chiron).into();
        assert!(matches!(err, SearchError::Ephemeris(_)));
        assert!(err.to_string().contains("Chiron"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            SearchError::InvalidConfig("step_days must be positive").to_string(),
            "invalid config: step_days must be positive"
        );
        assert_eq!(SearchError::Cancelled.to_string(), "search cancelled");
    }
}
