//! Core error types shared across the aeroscout crates.

use thiserror::Error;

/// Configuration-specific errors.
///
/// All of these are fatal before any network call is attempted: a pipeline
/// never starts with a malformed configuration or taxonomy.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config or taxonomy file not found at an explicitly given path
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where the file was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Taxonomy file parsed but contains no usable predicates
    #[error("taxonomy at {path} defines no tag predicates")]
    EmptyTaxonomy {
        /// Path to the taxonomy file
        path: String,
    },
}

/// Errors from coordinate construction.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90]
    #[error("latitude out of range [-90, 90]: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180]
    #[error("longitude out of range [-180, 180]: {0}")]
    InvalidLongitude(f64),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
