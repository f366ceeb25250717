//! Geographic entity model
//!
//! Canonical identifiers: 2-digit state FIPS, 5-digit county FIPS, bare
//! 5-digit CBSA code for metros, `"US"` for the nation. A canonical id is
//! unique within its kind; legacy aliases (notably the Connecticut
//! county → planning-region remap) are resolved by the geo resolver before
//! records are keyed.

use serde::{Deserialize, Serialize};

/// Kind of geography a record is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoKind {
    Nation,
    State,
    County,
    Metro,
}

/// A geography the pipeline produces records for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicEntity {
    /// Canonical identifier (FIPS or CBSA code, `"US"` for the nation)
    pub canonical_id: String,
    /// Geography kind
    pub kind: GeoKind,
    /// Human-readable name for display and search
    pub display_name: String,
}

impl GeographicEntity {
    pub fn new(canonical_id: impl Into<String>, kind: GeoKind, display_name: impl Into<String>) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            kind,
            display_name: display_name.into(),
        }
    }

    /// The national entity
    pub fn nation() -> Self {
        Self::new("US", GeoKind::Nation, "United States")
    }
}
