//! Collapsing near-duplicate physical sites.

use crate::filter::UNKNOWN_NAME;
use crate::model::CandidateSupplier;

/// Merges candidates that represent the same physical site.
///
/// Two candidates are the same site when they sit within the proximity
/// threshold of each other AND their names match case-insensitively, or
/// either side has no real name. A single greedy pass in input order; the
/// first occurrence anchors its cluster. O(n·k) over clusters, fine at the
/// few hundred records a radius query returns.
pub struct Deduplicator {
    threshold_m: f64,
}

impl Deduplicator {
    /// Create a deduplicator with the given proximity threshold in meters.
    #[must_use]
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Collapse duplicates, keeping one representative per site.
    ///
    /// A newcomer overwrites its cluster's representative fields only when
    /// its confidence is strictly greater, so the representative always
    /// carries the maximum confidence seen for the site. Returns the
    /// survivors sorted ascending by distance.
    #[must_use]
    pub fn deduplicate(&self, candidates: Vec<CandidateSupplier>) -> Vec<CandidateSupplier> {
        let before = candidates.len();
        let mut unique: Vec<CandidateSupplier> = Vec::new();

        'next: for candidate in candidates {
            for kept in &mut unique {
                if self.same_site(&candidate, kept) {
                    if candidate.confidence > kept.confidence {
                        *kept = candidate;
                    }
                    continue 'next;
                }
            }
            unique.push(candidate);
        }

        unique.sort_by(|a, b| {
            a.distance_miles
                .partial_cmp(&b.distance_miles)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(before, after = unique.len(), "deduplication complete");
        unique
    }

    fn same_site(&self, a: &CandidateSupplier, b: &CandidateSupplier) -> bool {
        let distance = a.coordinate.distance_meters(b.coordinate);
        if distance >= self.threshold_m {
            return false;
        }
        a.name.eq_ignore_ascii_case(&b.name) || a.name == UNKNOWN_NAME || b.name == UNKNOWN_NAME
    }
}
