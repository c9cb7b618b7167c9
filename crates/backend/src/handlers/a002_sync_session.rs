use axum::extract::{Json, Path, Query};
use serde::Deserialize;

use contracts::domain::a002_sync_session::SyncSession;

use crate::domain::a002_sync_session;
use crate::shared::api_error::ApiError;

#[derive(Deserialize)]
pub struct ListSessionsQuery {
    /// Maximum number of sessions, newest first
    pub limit: Option<u64>,
}

/// GET /api/sync/sessions
pub async fn list_recent(
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<SyncSession>>, ApiError> {
    let limit = query.limit.unwrap_or(20).min(200);
    let sessions = a002_sync_session::service::list_recent(limit).await?;
    Ok(Json(sessions))
}

/// GET /api/sync/sessions/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<SyncSession>, ApiError> {
    a002_sync_session::service::get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
