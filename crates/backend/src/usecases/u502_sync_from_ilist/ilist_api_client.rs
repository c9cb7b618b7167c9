use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use contracts::domain::a001_property::PropertyDto;

/// One property record as served by the iList CRM feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IListProperty {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub sqr_meters: Option<f64>,
    #[serde(default)]
    pub rooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub construction_year: Option<i32>,
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
    /// Set by the CRM when the listing was removed remotely
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// One page of the remote feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IListPage {
    pub items: Vec<IListProperty>,
    pub total_count: u32,
}

/// Thin HTTP client over the iList property feed
pub struct IListApiClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl IListApiClient {
    pub fn new(base_url: &str, api_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// Fetch one page of properties. `since` narrows the feed to records
    /// modified after the given instant.
    pub async fn fetch_properties(
        &self,
        page: u32,
        page_size: u32,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    ) -> Result<IListPage> {
        let url = format!("{}/api/v1/properties", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(since) = since {
            query.push(("modifiedSince", since.to_rfc3339()));
        }
        if include_deleted {
            query.push(("includeDeleted", "true".to_string()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Failed to reach iList at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("iList returned {} for page {}: {}", status, page, body);
        }

        response
            .json::<IListPage>()
            .await
            .context("Failed to decode iList property page")
    }
}

/// Map a remote record onto the local DTO, keyed by the remote id
pub fn map_remote_property(remote: &IListProperty) -> PropertyDto {
    PropertyDto {
        id: None,
        code: None,
        title: remote.title.clone(),
        price: remote.price,
        sqr_meters: remote.sqr_meters,
        rooms: remote.rooms,
        bathrooms: remote.bathrooms,
        building_year: remote.construction_year,
        latitude: remote.latitude,
        longitude: remote.longitude,
        area_id: remote.area_id,
        subarea_id: remote.subarea_id,
        energy_class_id: remote.energy_class_id,
        postal_code: remote.postal_code,
        external_id: Some(remote.id.clone()),
        comment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_deserializes_from_camel_case_json() {
        let json = r#"{
            "items": [
                {
                    "id": "IL-1001",
                    "title": "Seafront maisonette",
                    "price": 420000.0,
                    "sqrMeters": 140.5,
                    "rooms": 4,
                    "constructionYear": 2009,
                    "isDeleted": false,
                    "modifiedAt": "2026-08-01T10:30:00Z"
                }
            ],
            "totalCount": 57
        }"#;

        let page: IListPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_count, 57);
        assert_eq!(page.items[0].id, "IL-1001");
        assert_eq!(page.items[0].sqr_meters, Some(140.5));
        assert_eq!(page.items[0].construction_year, Some(2009));
        assert!(!page.items[0].is_deleted);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"items": [{"id": "IL-2", "title": "Plot", "price": 1.0}], "totalCount": 1}"#;
        let page: IListPage = serde_json::from_str(json).unwrap();
        let item = &page.items[0];
        assert_eq!(item.rooms, None);
        assert!(!item.is_deleted);
        assert_eq!(item.modified_at, None);
    }

    #[test]
    fn remote_record_maps_onto_dto_with_external_id() {
        let remote = IListProperty {
            id: "IL-7".into(),
            title: "Loft".into(),
            price: 180000.0,
            sqr_meters: Some(65.0),
            rooms: Some(2),
            bathrooms: Some(1),
            construction_year: Some(1987),
            latitude: None,
            longitude: None,
            area_id: Some(3),
            subarea_id: None,
            energy_class_id: None,
            postal_code: Some(10558),
            is_deleted: false,
            modified_at: None,
        };

        let dto = map_remote_property(&remote);
        assert_eq!(dto.external_id.as_deref(), Some("IL-7"));
        assert_eq!(dto.title, "Loft");
        assert_eq!(dto.building_year, Some(1987));
        assert_eq!(dto.id, None);
        assert_eq!(dto.code, None);
    }
}
