//! Industrial supplier discovery around a geographic origin.
//!
//! Given an origin coordinate and a search radius, this crate queries a
//! spatial tag store (Overpass) for facilities matching a configurable
//! industrial taxonomy, scores and filters them, collapses near-duplicate
//! physical sites, optionally enriches survivors with reverse-geocoded
//! address fields, and returns candidates ordered by distance. The
//! [`DiscoveryOrchestrator`] is the single entry point.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dedup;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod model;
pub mod orchestrator;
pub mod overpass;
pub mod taxonomy;

pub use dedup::Deduplicator;
pub use enrich::EnrichmentPipeline;
pub use error::{DiscoveryError, Result};
pub use filter::TaxonomyFilter;
pub use model::{CandidateSupplier, DiscoveryOptions, RawFacilityRecord};
pub use orchestrator::DiscoveryOrchestrator;
pub use overpass::{OverpassClient, SpatialDiscovery};
pub use taxonomy::{TagPredicate, Taxonomy};
