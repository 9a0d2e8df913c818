//! Multi-provider geocoding with ordered failover.
//!
//! This crate turns free-text addresses into coordinates and coordinates back
//! into postal address fields. Providers are adapters behind the
//! [`GeocodeProvider`] trait; the [`GeocodeResolver`] walks them in a
//! configured priority order and accepts the first sufficiently confident
//! match. Lookups are memoized in a run-scoped [`GeocodeCache`] and paced by
//! a shared [`RateLimiter`] so free-tier endpoints are not overrun.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod limiter;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod reverse;

pub use cache::{normalize_address, GeocodeCache};
pub use error::{GeocodeError, Result};
pub use limiter::RateLimiter;
pub use provider::{AddressDetails, GeocodeProvider, GeocodeResult};
pub use providers::build_providers;
pub use resolver::GeocodeResolver;
pub use reverse::ReverseGeocoder;
