use contracts::domain::a001_property::PropertyDto;
use contracts::usecases::u501_import_from_file::{ImportMapping, RawRow};

/// A raw row after mapping and type coercion. Transient: lives only for
/// the duration of one import request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub title: String,
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
    pub external_id: Option<String>,
}

impl NormalizedRecord {
    pub fn into_dto(self) -> PropertyDto {
        PropertyDto {
            id: None,
            code: None,
            title: self.title,
            price: self.price,
            sqr_meters: self.sqr_meters,
            rooms: self.rooms,
            bathrooms: self.bathrooms,
            building_year: self.building_year,
            latitude: self.latitude,
            longitude: self.longitude,
            area_id: self.area_id,
            subarea_id: self.subarea_id,
            energy_class_id: self.energy_class_id,
            postal_code: self.postal_code,
            external_id: self.external_id,
            comment: None,
        }
    }
}

/// Apply a column mapping to one raw row.
///
/// Required fields (title, price) each contribute one error message when
/// missing or invalid; any such error fails the row. Optional fields are
/// coerced best-effort: a value that will not parse is dropped and noted
/// as a warning, and the row still imports.
pub fn normalize_row(
    row: &RawRow,
    mapping: &ImportMapping,
) -> Result<(NormalizedRecord, Vec<String>), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let title = match lookup(row, &mapping.title) {
        Some(v) => v.to_string(),
        None => {
            errors.push("Missing required field: title".to_string());
            String::new()
        }
    };

    let price = match lookup(row, &mapping.price) {
        Some(v) => match parse_decimal(v) {
            Some(p) if p > 0.0 => p,
            Some(p) => {
                errors.push(format!("Price must be a positive number, got '{}'", p));
                0.0
            }
            None => {
                errors.push(format!("Price is not a number: '{}'", v));
                0.0
            }
        },
        None => {
            errors.push("Missing required field: price".to_string());
            0.0
        }
    };

    let mut opt_f64 = |name: &str, column: &Option<String>| -> Option<f64> {
        lookup(row, column).and_then(|v| match parse_decimal(v) {
            Some(n) => Some(n),
            None => {
                warnings.push(format!("Dropped {}: '{}' is not a number", name, v));
                None
            }
        })
    };

    let sqr_meters = opt_f64("sqr_meters", &mapping.sqr_meters);
    let latitude = opt_f64("latitude", &mapping.latitude);
    let longitude = opt_f64("longitude", &mapping.longitude);

    let mut opt_i32 = |name: &str, column: &Option<String>| -> Option<i32> {
        lookup(row, column).and_then(|v| match v.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                warnings.push(format!("Dropped {}: '{}' is not an integer", name, v));
                None
            }
        })
    };

    let rooms = opt_i32("rooms", &mapping.rooms);
    let bathrooms = opt_i32("bathrooms", &mapping.bathrooms);
    let building_year = opt_i32("building_year", &mapping.building_year);
    let area_id = opt_i32("area_id", &mapping.area_id);
    let subarea_id = opt_i32("subarea_id", &mapping.subarea_id);
    let energy_class_id = opt_i32("energy_class_id", &mapping.energy_class_id);
    let postal_code = opt_i32("postal_code", &mapping.postal_code);

    let external_id = lookup(row, &mapping.external_id).map(str::to_string);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok((
        NormalizedRecord {
            title,
            price,
            sqr_meters,
            rooms,
            bathrooms,
            building_year,
            latitude,
            longitude,
            area_id,
            subarea_id,
            energy_class_id,
            postal_code,
            external_id,
        },
        warnings,
    ))
}

/// Value of the mapped column, treating blank cells as absent
fn lookup<'a>(row: &'a RawRow, column: &Option<String>) -> Option<&'a str> {
    column
        .as_deref()
        .and_then(|c| row.get(c))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Parse a decimal that may use comma as the separator (European format)
fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.replace(',', ".");
    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ImportMapping {
        ImportMapping {
            title: Some("title".into()),
            price: Some("price".into()),
            sqr_meters: Some("sqm".into()),
            rooms: Some("rooms".into()),
            ..Default::default()
        }
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_title_and_price_normalize() {
        let (rec, warnings) =
            normalize_row(&row(&[("title", "Flat"), ("price", "100")]), &mapping()).unwrap();
        assert_eq!(rec.title, "Flat");
        assert_eq!(rec.price, 100.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn comma_decimal_price_parses() {
        let (rec, _) =
            normalize_row(&row(&[("title", "Flat"), ("price", "99,5")]), &mapping()).unwrap();
        assert_eq!(rec.price, 99.5);
    }

    #[test]
    fn missing_title_and_bad_price_accumulate_two_errors() {
        let errors =
            normalize_row(&row(&[("price", "cheap")]), &mapping()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("title"));
        assert!(errors[1].contains("not a number"));
    }

    #[test]
    fn negative_price_fails_the_row() {
        let errors =
            normalize_row(&row(&[("title", "Flat"), ("price", "-10")]), &mapping()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("positive"));
    }

    #[test]
    fn bad_optional_field_is_dropped_with_warning() {
        let (rec, warnings) = normalize_row(
            &row(&[("title", "Flat"), ("price", "100"), ("sqm", "large"), ("rooms", "3")]),
            &mapping(),
        )
        .unwrap();
        assert_eq!(rec.sqr_meters, None);
        assert_eq!(rec.rooms, Some(3));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("sqr_meters"));
    }

    #[test]
    fn blank_cell_counts_as_absent() {
        let errors =
            normalize_row(&row(&[("title", "   "), ("price", "100")]), &mapping()).unwrap_err();
        assert_eq!(errors, vec!["Missing required field: title".to_string()]);
    }

    #[test]
    fn unmapped_optional_fields_stay_none_without_warnings() {
        let (rec, warnings) =
            normalize_row(&row(&[("title", "Flat"), ("price", "1")]), &mapping()).unwrap();
        assert_eq!(rec.bathrooms, None);
        assert_eq!(rec.external_id, None);
        assert!(warnings.is_empty());
    }
}
