//! Aeroscout core - shared geometry, configuration, and error types.
//!
//! This crate holds the pieces every other aeroscout crate depends on:
//! validated coordinates with great-circle distance, the TOML application
//! configuration (with environment overrides for secrets), and the
//! configuration error taxonomy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod geo;

// Re-export commonly used types
pub use config::{AppConfig, DiscoveryConfig, EnrichmentConfig, GeocodeConfig};
pub use error::{ConfigError, ConfigResult, GeoError};
pub use geo::{round_miles, Coordinate, METERS_PER_MILE};
