use axum::extract::{Json, Path};
use serde::Deserialize;
use serde_json::json;

use contracts::domain::a001_property::{Property, PropertyDto};

use crate::domain::{a001_property, a002_sync_session};
use crate::shared::api_error::ApiError;
use crate::shared::logger;

fn parse_id(id: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", id)))
}

/// GET /api/properties
pub async fn list_all() -> Result<Json<Vec<Property>>, ApiError> {
    let properties = a001_property::service::list_all().await?;
    Ok(Json(properties))
}

/// GET /api/properties/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Property>, ApiError> {
    let uuid = parse_id(&id)?;
    a001_property::service::get_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /api/properties
///
/// Creates when the body carries no id, updates otherwise.
pub async fn upsert(Json(dto): Json<PropertyDto>) -> Result<Json<serde_json::Value>, ApiError> {
    let id = if dto.id.is_some() {
        let id = dto.id.clone().unwrap_or_default();
        a001_property::service::update(dto)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        id
    } else {
        a001_property::service::create(dto)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .to_string()
    };

    Ok(Json(json!({"id": id})))
}

/// DELETE /api/properties/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = parse_id(&id)?;
    if a001_property::service::delete(uuid).await? {
        Ok(Json(json!({"success": true})))
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub is_active: bool,
}

/// GET /api/properties/:id/status
pub async fn get_status(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = parse_id(&id)?;
    let property = a001_property::service::get_by_id(uuid)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({
        "id": id,
        "is_active": property.is_active,
        "last_update": property.last_update,
    })))
}

/// PUT /api/properties/:id/status
///
/// Flips the active flag and records the transition as a one-shot
/// status-update session.
pub async fn set_status(
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = parse_id(&id)?;

    if !a001_property::service::set_active(uuid, request.is_active).await? {
        return Err(ApiError::NotFound);
    }

    let session_id = a002_sync_session::service::record_status_update(uuid, request.is_active)
        .await?;

    logger::log(
        "property_status",
        &format!(
            "Property {} set {}",
            uuid,
            if request.is_active { "active" } else { "inactive" }
        ),
    );

    Ok(Json(json!({
        "id": id,
        "is_active": request.is_active,
        "session_id": session_id,
    })))
}
