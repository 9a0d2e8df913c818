//! Industry taxonomy: tag predicates and name keywords.
//!
//! The taxonomy decides which spatial records count as candidate suppliers
//! and feeds the confidence heuristic. It is loaded once per process from a
//! TOML file; a missing file yields the built-in industrial defaults, while a
//! present-but-empty file is a configuration error.

use crate::error::Result;
use aeroscout_core::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// A single tag predicate matched against a record's tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPredicate {
    /// Tag key must be present with exactly this value
    KeyValue {
        /// Tag key
        key: String,
        /// Required tag value
        value: String,
    },
    /// Tag key must be present, any value
    KeyExists {
        /// Tag key
        key: String,
    },
}

impl TagPredicate {
    /// Parse a predicate from its `key=value` or bare `key` form.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] when either side of the
    /// predicate is empty.
    pub fn parse(raw: &str) -> std::result::Result<Self, ConfigError> {
        let raw = raw.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "taxonomy.predicates".to_string(),
            reason: format!("{reason}: '{raw}'"),
        };

        match raw.split_once('=') {
            Some((key, value)) => {
                let (key, value) = (key.trim(), value.trim());
                if key.is_empty() || value.is_empty() {
                    return Err(invalid("empty key or value"));
                }
                Ok(Self::KeyValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
            None => {
                if raw.is_empty() {
                    return Err(invalid("empty predicate"));
                }
                Ok(Self::KeyExists {
                    key: raw.to_string(),
                })
            }
        }
    }

    /// Whether the given tag set satisfies this predicate.
    #[must_use]
    pub fn matches(&self, tags: &std::collections::HashMap<String, String>) -> bool {
        match self {
            Self::KeyValue { key, value } => tags.get(key).is_some_and(|v| v == value),
            Self::KeyExists { key } => tags.contains_key(key),
        }
    }
}

impl fmt::Display for TagPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyValue { key, value } => write!(f, "{key}={value}"),
            Self::KeyExists { key } => write!(f, "{key}"),
        }
    }
}

/// On-disk taxonomy file shape.
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    predicates: Vec<String>,
    #[serde(default)]
    name_keywords: Vec<String>,
}

/// The loaded industry taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    predicates: Vec<TagPredicate>,
    name_keywords: Vec<String>,
}

impl Taxonomy {
    /// Built-in industrial defaults, used when no taxonomy file exists.
    #[must_use]
    pub fn industrial_defaults() -> Self {
        let predicates = [
            "landuse=industrial",
            "building=industrial",
            "man_made=works",
            "industrial",
        ];
        Self {
            // Parsing the built-in literals cannot fail.
            predicates: predicates
                .iter()
                .filter_map(|p| TagPredicate::parse(p).ok())
                .collect(),
            name_keywords: ["aero", "avionics", "composite", "defence", "machining"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Load the taxonomy from a TOML file.
    ///
    /// A missing file falls back to [`Taxonomy::industrial_defaults`]. A file
    /// that exists but configures no predicates is rejected, since it would
    /// silently discover nothing.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on read/parse failure, an unparsable
    /// predicate, or an empty predicate list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("taxonomy file not found, using industrial defaults");
            return Ok(Self::industrial_defaults());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let file: TaxonomyFile = toml::from_str(&contents).map_err(ConfigError::from)?;

        if file.predicates.is_empty() {
            return Err(ConfigError::EmptyTaxonomy {
                path: path.display().to_string(),
            }
            .into());
        }

        let predicates = file
            .predicates
            .iter()
            .map(|p| TagPredicate::parse(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::info!(
            predicates = predicates.len(),
            keywords = file.name_keywords.len(),
            "taxonomy loaded from {}",
            path.display()
        );

        Ok(Self {
            predicates,
            name_keywords: file
                .name_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        })
    }

    /// Configured tag predicates, in file order.
    #[must_use]
    pub fn predicates(&self) -> &[TagPredicate] {
        &self.predicates
    }

    /// Whether any predicate matches the given tag set.
    #[must_use]
    pub fn matches(&self, tags: &std::collections::HashMap<String, String>) -> bool {
        self.predicates.iter().any(|p| p.matches(tags))
    }

    /// Whether the name contains any curated keyword (case-insensitive).
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.name_keywords.iter().any(|k| name.contains(k))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::industrial_defaults()
    }
}
