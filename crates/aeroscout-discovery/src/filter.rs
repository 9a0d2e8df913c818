//! Classification of raw facility records into candidate suppliers.

use crate::model::{CandidateSupplier, RawFacilityRecord};
use crate::taxonomy::Taxonomy;
use aeroscout_core::{round_miles, Coordinate};

/// Name used for records whose source reports no name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Confidence for a name-keyword match.
const CONFIDENCE_KEYWORD: f64 = 0.9;
/// Confidence for an industrial/building tag match without a keyword.
const CONFIDENCE_INDUSTRIAL_TAG: f64 = 0.7;
/// Baseline confidence for any other included record.
const CONFIDENCE_BASELINE: f64 = 0.5;

/// Scores and filters raw records against the taxonomy.
pub struct TaxonomyFilter {
    taxonomy: Taxonomy,
    source: String,
}

impl TaxonomyFilter {
    /// Create a filter over the given taxonomy.
    #[must_use]
    pub fn new(taxonomy: Taxonomy, source: impl Into<String>) -> Self {
        Self {
            taxonomy,
            source: source.into(),
        }
    }

    /// Classify one record, or `None` when no predicate matches its tags.
    ///
    /// The Overpass query already selects on the same predicates, so `None`
    /// here is a safety net against sources returning broader sets.
    #[must_use]
    pub fn classify(
        &self,
        record: &RawFacilityRecord,
        origin: Coordinate,
    ) -> Option<CandidateSupplier> {
        if !self.taxonomy.matches(&record.tags) {
            return None;
        }

        let name = record
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Some(CandidateSupplier {
            confidence: self.score(&name, record),
            address: record.tags.get("addr:full").cloned().unwrap_or_default(),
            distance_miles: round_miles(origin.distance_miles(record.coordinate)),
            coordinate: record.coordinate,
            source: self.source.clone(),
            name,
            street: None,
            postcode: None,
            city: None,
            country: None,
        })
    }

    /// Classify a batch of records, dropping the non-matching ones.
    #[must_use]
    pub fn classify_all(
        &self,
        records: &[RawFacilityRecord],
        origin: Coordinate,
    ) -> Vec<CandidateSupplier> {
        records
            .iter()
            .filter_map(|r| self.classify(r, origin))
            .collect()
    }

    fn score(&self, name: &str, record: &RawFacilityRecord) -> f64 {
        if self.taxonomy.name_matches(name) {
            CONFIDENCE_KEYWORD
        } else if record.tags.contains_key("industrial") || record.tags.contains_key("building") {
            CONFIDENCE_INDUSTRIAL_TAG
        } else {
            CONFIDENCE_BASELINE
        }
    }
}
