//! Overpass API client for spatial facility discovery.

use crate::error::{DiscoveryError, Result};
use crate::model::RawFacilityRecord;
use crate::taxonomy::Taxonomy;
use aeroscout_core::{Coordinate, METERS_PER_MILE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Source of raw facility records around an origin point.
///
/// The orchestrator talks to discovery through this trait so pipelines can be
/// tested against in-memory sources.
#[async_trait]
pub trait SpatialDiscovery: Send + Sync {
    /// Fetch all records matching the taxonomy within `radius_miles` of
    /// `origin`.
    ///
    /// # Errors
    /// Transport failures and malformed responses are fatal for the call;
    /// there is no internal retry.
    async fn discover(
        &self,
        origin: Coordinate,
        radius_miles: f64,
    ) -> Result<Vec<RawFacilityRecord>>;
}

/// Overpass API client.
///
/// Issues one composite query covering every configured tag predicate, for
/// both point (`node`) and area (`way`) records. Areas are represented by the
/// centroid Overpass computes under `out center;`.
pub struct OverpassClient {
    client: Client,
    url: String,
    taxonomy: Taxonomy,
}

impl OverpassClient {
    /// Create a client for the given Overpass endpoint.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, taxonomy: Taxonomy, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DiscoveryError::Network)?;
        Ok(Self {
            client,
            url: url.into(),
            taxonomy,
        })
    }

    /// Build the composite Overpass QL query.
    #[allow(clippy::cast_possible_truncation)]
    fn build_query(&self, origin: Coordinate, radius_miles: f64) -> String {
        // Overpass takes an integer radius in meters.
        let radius_m = (radius_miles * METERS_PER_MILE) as i64;
        let (lat, lon) = (origin.lat(), origin.lon());

        let mut clauses = String::new();
        for predicate in self.taxonomy.predicates() {
            clauses.push_str(&format!("node(around:{radius_m},{lat},{lon})[{predicate}];"));
            clauses.push_str(&format!("way(around:{radius_m},{lat},{lon})[{predicate}];"));
        }
        format!("[out:json];({clauses});out center;")
    }

    fn parse_elements(elements: Vec<OverpassElement>) -> Vec<RawFacilityRecord> {
        let mut records = Vec::with_capacity(elements.len());
        for element in elements {
            let position = match (element.lat, element.lon, element.center) {
                (Some(lat), Some(lon), _) => Some((lat, lon)),
                (_, _, Some(center)) => Some((center.lat, center.lon)),
                // An area without a computed center carries no usable
                // position; drop it rather than failing the whole response.
                _ => None,
            };

            let Some((lat, lon)) = position else {
                tracing::debug!(kind = %element.kind, "dropping element without position");
                continue;
            };

            let Ok(coordinate) = Coordinate::new(lat, lon) else {
                tracing::debug!(lat, lon, "dropping element with out-of-range position");
                continue;
            };

            let name = element
                .tags
                .get("name")
                .filter(|n| !n.is_empty())
                .cloned();

            records.push(RawFacilityRecord {
                name,
                tags: element.tags,
                coordinate,
            });
        }
        records
    }
}

#[async_trait]
impl SpatialDiscovery for OverpassClient {
    async fn discover(
        &self,
        origin: Coordinate,
        radius_miles: f64,
    ) -> Result<Vec<RawFacilityRecord>> {
        let query = self.build_query(origin, radius_miles);
        tracing::debug!(%origin, radius_miles, "issuing overpass query");

        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| DiscoveryError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DiscoveryError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: OverpassResponse =
            response.json().await.map_err(|e| DiscoveryError::Parse {
                message: e.to_string(),
            })?;

        let records = Self::parse_elements(body.elements);
        tracing::info!(records = records.len(), "overpass discovery complete");
        Ok(records)
    }
}

// Overpass API types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OverpassClient {
        OverpassClient::new(
            "https://overpass-api.de/api/interpreter",
            Taxonomy::industrial_defaults(),
            Duration::from_secs(30),
        )
        .expect("create client")
    }

    #[test]
    fn test_query_covers_nodes_and_ways_per_predicate() {
        let origin = Coordinate::new(51.5088, -2.5782).expect("valid coordinate");
        let query = client().build_query(origin, 5.0);

        // 5 miles is 8046 whole meters.
        assert!(query.contains("node(around:8046,51.5088,-2.5782)[landuse=industrial];"));
        assert!(query.contains("way(around:8046,51.5088,-2.5782)[landuse=industrial];"));
        assert!(query.contains("[industrial];"));
        assert!(query.ends_with("out center;"));
    }

    #[test]
    fn test_parse_node_and_way_elements() {
        let body = r#"{
            "elements": [
                {
                    "type": "node",
                    "lat": 51.5090, "lon": -2.5800,
                    "tags": {"name": "Filton Composites", "industrial": "manufacture"}
                },
                {
                    "type": "way",
                    "center": {"lat": 51.5100, "lon": -2.5810},
                    "tags": {"landuse": "industrial"}
                }
            ]
        }"#;
        let parsed: OverpassResponse = serde_json::from_str(body).expect("parse body");
        let records = OverpassClient::parse_elements(parsed.elements);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("Filton Composites"));
        assert!(records[1].name.is_none());
        assert!((records[1].coordinate.lat() - 51.5100).abs() < 1e-9);
    }

    #[test]
    fn test_way_without_center_is_dropped() {
        let body = r#"{
            "elements": [
                {"type": "way", "tags": {"landuse": "industrial"}},
                {"type": "node", "lat": 51.5, "lon": -2.5, "tags": {}}
            ]
        }"#;
        let parsed: OverpassResponse = serde_json::from_str(body).expect("parse body");
        let records = OverpassClient::parse_elements(parsed.elements);

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_name_tag_is_treated_as_missing() {
        let body = r#"{
            "elements": [
                {"type": "node", "lat": 51.5, "lon": -2.5, "tags": {"name": ""}}
            ]
        }"#;
        let parsed: OverpassResponse = serde_json::from_str(body).expect("parse body");
        let records = OverpassClient::parse_elements(parsed.elements);

        assert!(records[0].name.is_none());
    }
}
