use axum::extract::Json;

use contracts::shared::logger::{CreateLogRequest, LogEntry};

use crate::shared::api_error::ApiError;
use crate::shared::logger;

/// GET /api/logs
pub async fn list_all() -> Result<Json<Vec<LogEntry>>, ApiError> {
    let logs = logger::repository::get_all_logs().await?;
    Ok(Json(logs))
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> Result<(), ApiError> {
    logger::repository::log_event(&req.source, &req.category, &req.message).await?;
    Ok(())
}

/// DELETE /api/logs
pub async fn clear_all() -> Result<(), ApiError> {
    logger::repository::clear_all_logs().await?;
    Ok(())
}
