//! Configuration loading for the gochara transit engine.
//!
//! A single TOML file carries the scan, orb, relationship, return-search,
//! ephemeris and natal settings. Every field has a default, so an empty file
//! is valid. Library crates receive the typed values ([`ScanConfig`],
//! [`ReturnConfig`], [`OrbPolicy`]) and never see raw TOML.
//!
//! [`ScanConfig`]: gochara_search::ScanConfig
//! [`ReturnConfig`]: gochara_search::ReturnConfig
//! [`OrbPolicy`]: gochara_search::OrbPolicy

pub mod config;
pub mod error;

pub use config::{EphemerisSource, GocharaConfig, NatalSetup};
pub use error::ConfigError;
