use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a property listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub Uuid);

impl PropertyId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for PropertyId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PropertyId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A property listing. The listing title lives in `base.description`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(flatten)]
    pub base: BaseAggregate<PropertyId>,

    /// Asking price; always positive for a persisted record
    pub price: f64,

    pub sqr_meters: Option<f64>,
    pub rooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub building_year: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_id: Option<i32>,
    pub subarea_id: Option<i32>,
    pub energy_class_id: Option<i32>,
    pub postal_code: Option<i32>,

    /// Identifier of the matching record in the iList CRM, when known.
    /// Upserts from imports and syncs are keyed by this value.
    pub external_id: Option<String>,

    /// Binary active/inactive flag surfaced on the marketing site
    pub is_active: bool,

    /// Timestamp of the last import/sync that touched this record
    pub last_update: Option<chrono::DateTime<chrono::Utc>>,
}

impl Property {
    pub fn new_for_insert(
        code: String,
        title: String,
        price: f64,
        external_id: Option<String>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(PropertyId::new_v4(), code, title);
        base.comment = comment;

        Self {
            base,
            price,
            sqr_meters: None,
            rooms: None,
            bathrooms: None,
            building_year: None,
            latitude: None,
            longitude: None,
            area_id: None,
            subarea_id: None,
            energy_class_id: None,
            postal_code: None,
            external_id,
            is_active: true,
            last_update: None,
        }
    }

    /// Apply editable DTO fields onto an existing aggregate
    pub fn update(&mut self, dto: &PropertyDto) {
        self.base.description = dto.title.clone();
        self.base.comment = dto.comment.clone();
        self.price = dto.price;
        self.sqr_meters = dto.sqr_meters;
        self.rooms = dto.rooms;
        self.bathrooms = dto.bathrooms;
        self.building_year = dto.building_year;
        self.latitude = dto.latitude;
        self.longitude = dto.longitude;
        self.area_id = dto.area_id;
        self.subarea_id = dto.subarea_id;
        self.energy_class_id = dto.energy_class_id;
        self.postal_code = dto.postal_code;
        if dto.external_id.is_some() {
            self.external_id = dto.external_id.clone();
        }
    }

    /// Required-field validation; a record failing this is never persisted
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Title cannot be empty".into());
        }
        if !(self.price > 0.0) {
            return Err("Price must be a positive number".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code cannot be empty".into());
        }
        Ok(())
    }

    /// Hook run before every write
    pub fn before_write(&mut self) {
        self.base.touch();
        self.base.metadata.increment_version();
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Property payload as exchanged with API callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub sqr_meters: Option<f64>,
    #[serde(default)]
    pub rooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub building_year: Option<i32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub area_id: Option<i32>,
    #[serde(default)]
    pub subarea_id: Option<i32>,
    #[serde(default)]
    pub energy_class_id: Option<i32>,
    #[serde(default)]
    pub postal_code: Option<i32>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_title_and_price_pass_validation() {
        let p = Property::new_for_insert("PROP-1".into(), "Flat in Koukaki".into(), 250_000.0, None, None);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_or_negative_price_fails_validation() {
        let mut p = Property::new_for_insert("PROP-1".into(), "Flat".into(), 0.0, None, None);
        assert!(p.validate().is_err());
        p.price = -5.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn before_write_bumps_version() {
        let mut p = Property::new_for_insert("PROP-1".into(), "Flat".into(), 1.0, None, None);
        let v = p.base.metadata.version;
        p.before_write();
        assert_eq!(p.base.metadata.version, v + 1);
    }
}
