//! Data model for discovered facilities and candidate suppliers.

use aeroscout_core::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A facility as returned by a spatial data source, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFacilityRecord {
    /// Facility name, if the source has one
    pub name: Option<String>,
    /// Source tags (key/value metadata, e.g. OSM tags)
    pub tags: HashMap<String, String>,
    /// Facility location
    pub coordinate: Coordinate,
}

/// A classified candidate supplier, the pipeline's output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSupplier {
    /// Facility name, or "Unknown" when the source has none
    pub name: String,
    /// Display address, empty until enrichment fills it
    #[serde(default)]
    pub address: String,
    /// Facility location
    pub coordinate: Coordinate,
    /// Distance from the search anchor, in miles, rounded to 2 decimals
    pub distance_miles: f64,
    /// Identifier of the data source that produced the record
    pub source: String,
    /// Relevance score in [0, 1]
    pub confidence: f64,

    /// Street, filled in by enrichment
    #[serde(default)]
    pub street: Option<String>,
    /// Postal code, filled in by enrichment
    #[serde(default)]
    pub postcode: Option<String>,
    /// City or town, filled in by enrichment
    #[serde(default)]
    pub city: Option<String>,
    /// Country, filled in by enrichment
    #[serde(default)]
    pub country: Option<String>,
}

impl CandidateSupplier {
    /// Whether enrichment has populated any address field.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.street.is_some()
            || self.postcode.is_some()
            || self.city.is_some()
            || self.country.is_some()
    }
}

/// Per-run switches for the discovery pipeline.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryOptions {
    /// Collapse near-duplicate facilities before output
    pub deduplicate: bool,
    /// Reverse-geocode each candidate into address fields
    pub reverse_geocode: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            deduplicate: true,
            reverse_geocode: true,
        }
    }
}
