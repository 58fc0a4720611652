//! Configuration errors.

use std::path::PathBuf;

use gochara_core::EphemerisError;
use gochara_time::TimeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl From<&'static str> for ConfigError {
    fn from(msg: &'static str) -> Self {
        Self::Invalid(msg.to_string())
    }
}
