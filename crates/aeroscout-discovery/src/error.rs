//! Error types for the discovery pipeline.

use aeroscout_core::ConfigError;
use aeroscout_geocode::GeocodeError;
use thiserror::Error;

/// Errors that can occur during supplier discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Data source is unreachable or refused the query
    #[error("discovery source unavailable: {message}")]
    Unavailable {
        /// Failure detail
        message: String,
    },

    /// Data source returned a non-success HTTP status
    #[error("discovery API error: status {status}, {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message or response excerpt
        message: String,
    },

    /// Response body could not be interpreted
    #[error("failed to parse discovery response: {message}")]
    Parse {
        /// Parse failure detail
        message: String,
    },

    /// Network error (transport failure or timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration problem (taxonomy file, thresholds)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Geocoding failure while anchoring or enriching
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiscoveryError::ApiError {
            status: 504,
            message: "gateway timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "discovery API error: status 504, gateway timeout"
        );
    }

    #[test]
    fn test_geocode_error_is_transparent() {
        let err = DiscoveryError::from(GeocodeError::EmptyAddress);
        assert_eq!(err.to_string(), "address is empty");
    }
}
