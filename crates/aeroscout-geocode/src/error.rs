//! Error types for the geocoding subsystem.

use thiserror::Error;

/// Errors that can occur during geocoding operations.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Every configured provider failed or was under-confident
    #[error("all geocoding providers failed for '{address}': {last_error}")]
    Exhausted {
        /// The address that could not be resolved
        address: String,
        /// The last provider failure, for diagnostics
        last_error: String,
    },

    /// Address was empty after normalization
    #[error("address is empty")]
    EmptyAddress,

    /// Provider signalled rate limiting or temporary overload
    #[error("rate limited by {provider} (status {status})")]
    RateLimited {
        /// Provider identifier
        provider: String,
        /// HTTP status code (429 or 503)
        status: u16,
    },

    /// Provider returned a non-success HTTP status
    #[error("API error ({provider}): status {status}, {message}")]
    ApiError {
        /// Provider identifier
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message or response excerpt
        message: String,
    },

    /// Provider responded but reported a failure of its own
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider identifier
        provider: String,
        /// Provider-reported failure
        message: String,
    },

    /// Provider returned an empty match list
    #[error("empty result from {provider}")]
    EmptyResult {
        /// Provider identifier
        provider: String,
    },

    /// Result confidence fell below the configured minimum
    #[error("low confidence from {provider}: {confidence} < {threshold}")]
    LowConfidence {
        /// Provider identifier
        provider: String,
        /// Confidence the provider reported
        confidence: f64,
        /// Configured minimum
        threshold: f64,
    },

    /// Provider requires an API key that is not configured
    #[error("credentials not configured for {provider}")]
    MissingCredentials {
        /// Provider identifier
        provider: String,
    },

    /// Provider does not support reverse geocoding
    #[error("reverse geocoding not supported by {provider}")]
    ReverseUnsupported {
        /// Provider identifier
        provider: String,
    },

    /// Provider name in the configured order is unknown
    #[error("unknown geocoding provider: {name}")]
    UnknownProvider {
        /// The unrecognized provider name
        name: String,
    },

    /// Response body could not be interpreted
    #[error("failed to parse response from {provider}: {message}")]
    Parse {
        /// Provider identifier
        provider: String,
        /// Parse failure detail
        message: String,
    },

    /// Network error (transport failure or timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;
