use contracts::usecases::u501_import_from_file::{ImportField, ImportMapping};

/// Known synonym substrings per target field, in suggestion order.
/// The first two fields are the required ones.
const FIELD_PATTERNS: &[(&str, &[&str])] = &[
    ("title", &["title", "name", "headline", "listing"]),
    ("price", &["price", "cost", "amount", "asking"]),
    ("sqr_meters", &["sqr", "sqm", "m2", "square", "size", "meters"]),
    ("rooms", &["rooms", "bedrooms", "beds"]),
    ("bathrooms", &["bath", "wc"]),
    ("building_year", &["year", "built", "construction"]),
    ("latitude", &["latitude", "lat"]),
    ("longitude", &["longitude", "lng", "lon"]),
    ("area_id", &["area", "region", "municipality"]),
    ("subarea_id", &["subarea", "neighborhood", "district"]),
    ("energy_class_id", &["energy"]),
    ("postal_code", &["postal", "zip"]),
    ("external_id", &["external", "ilist", "crm", "reference", "ref"]),
];

const REQUIRED_FIELDS: &[&str] = &["title", "price"];

/// Propose a column assignment for the given headers.
///
/// For each target field the synonym list is walked in order and the first
/// header where either string contains the other wins. Purely advisory; the
/// caller may override any assignment, and a header may serve several
/// target fields. Deterministic, so running it twice yields the same result.
pub fn suggest_mapping(headers: &[String]) -> ImportMapping {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let mut mapping = ImportMapping::default();
    for (field, patterns) in FIELD_PATTERNS {
        'field: for pattern in *patterns {
            for (i, header) in lowered.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                if header.contains(pattern) || pattern.contains(header.as_str()) {
                    *slot(&mut mapping, field) = Some(headers[i].clone());
                    break 'field;
                }
            }
        }
    }
    mapping
}

/// The fixed schema of importable fields, suggestion order preserved
pub fn import_fields() -> Vec<ImportField> {
    FIELD_PATTERNS
        .iter()
        .map(|(name, _)| ImportField {
            name: name.to_string(),
            required: REQUIRED_FIELDS.contains(name),
        })
        .collect()
}

/// A ready-to-fill CSV template matching the import schema
pub fn sample_csv() -> String {
    let header = FIELD_PATTERNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",");
    let sample = "Sunny apartment in Pagrati,245000,88,3,1,1998,37.9651,23.7402,12,103,4,11633,IL-2201";
    format!("{}\n{}\n", header, sample)
}

fn slot<'a>(mapping: &'a mut ImportMapping, field: &str) -> &'a mut Option<String> {
    match field {
        "title" => &mut mapping.title,
        "price" => &mut mapping.price,
        "sqr_meters" => &mut mapping.sqr_meters,
        "rooms" => &mut mapping.rooms,
        "bathrooms" => &mut mapping.bathrooms,
        "building_year" => &mut mapping.building_year,
        "latitude" => &mut mapping.latitude,
        "longitude" => &mut mapping.longitude,
        "area_id" => &mut mapping.area_id,
        "subarea_id" => &mut mapping.subarea_id,
        "energy_class_id" => &mut mapping.energy_class_id,
        "postal_code" => &mut mapping.postal_code,
        "external_id" => &mut mapping.external_id,
        other => unreachable!("unknown target field {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_common_headers() {
        let m = suggest_mapping(&headers(&["Listing Title", "Asking Price", "SQM", "Bedrooms"]));
        assert_eq!(m.title.as_deref(), Some("Listing Title"));
        assert_eq!(m.price.as_deref(), Some("Asking Price"));
        assert_eq!(m.sqr_meters.as_deref(), Some("SQM"));
        assert_eq!(m.rooms.as_deref(), Some("Bedrooms"));
    }

    #[test]
    fn suggestion_is_idempotent() {
        let h = headers(&["title", "price", "area", "subarea", "zip"]);
        assert_eq!(suggest_mapping(&h), suggest_mapping(&h));
    }

    #[test]
    fn unmatched_fields_stay_unassigned() {
        let m = suggest_mapping(&headers(&["foo", "bar"]));
        assert_eq!(m, ImportMapping::default());
    }

    #[test]
    fn header_may_serve_multiple_fields() {
        // "area" matches both area_id and (via substring) subarea_id patterns
        let m = suggest_mapping(&headers(&["subarea"]));
        assert_eq!(m.area_id.as_deref(), Some("subarea"));
        assert_eq!(m.subarea_id.as_deref(), Some("subarea"));
    }

    #[test]
    fn first_matching_header_wins_per_field() {
        let m = suggest_mapping(&headers(&["price_old", "price"]));
        assert_eq!(m.price.as_deref(), Some("price_old"));
    }

    #[test]
    fn template_marks_title_and_price_required() {
        let fields = import_fields();
        let required: Vec<_> = fields.iter().filter(|f| f.required).map(|f| f.name.as_str()).collect();
        assert_eq!(required, vec!["title", "price"]);
        assert!(sample_csv().starts_with("title,price,"));
    }
}
