use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One parsed row: source column name to raw string value.
/// Produced fresh per parse and never mutated afterwards.
pub type RawRow = HashMap<String, String>;

/// Assignment of source columns to target schema fields.
///
/// Nothing forces source columns to be distinct: when several target fields
/// name the same column, normalization reads the column once per field and
/// the last write wins. Every assignment is caller-overridable before submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMapping {
    pub title: Option<String>,
    pub price: Option<String>,
    pub sqr_meters: Option<String>,
    pub rooms: Option<String>,
    pub bathrooms: Option<String>,
    pub building_year: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub area_id: Option<String>,
    pub subarea_id: Option<String>,
    pub energy_class_id: Option<String>,
    pub postal_code: Option<String>,
    pub external_id: Option<String>,
}

/// What to do when some rows of a batch fail validation or persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Persist every valid row, report the rest (source behavior)
    #[default]
    BestEffort,
    /// Reject the whole batch when any row fails validation
    AllOrNothing,
}

/// Request body for submitting a parsed tabular import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSubmitRequest {
    pub rows: Vec<RawRow>,
    pub mapping: ImportMapping,
    #[serde(default)]
    pub policy: ImportPolicy,
}
