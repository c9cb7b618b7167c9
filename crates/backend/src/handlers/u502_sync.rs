use axum::extract::Json;
use axum::http::HeaderMap;

use contracts::usecases::u502_sync_from_ilist::{
    SyncOutcome, SyncStatusResponse, SyncTriggerRequest,
};

use crate::domain::a002_sync_session;
use crate::shared::api_error::ApiError;
use crate::shared::config::get_config;
use crate::shared::logger;
use crate::usecases::u502_sync_from_ilist::{IListApiClient, RepositoryStore, SyncExecutor};

/// POST /api/sync/trigger
///
/// Meant for an external scheduler; authenticated by the shared secret
/// in the X-Sync-Secret header instead of a user token.
pub async fn trigger(
    headers: HeaderMap,
    Json(request): Json<SyncTriggerRequest>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let config = get_config();

    let provided = headers
        .get("X-Sync-Secret")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    if !secrets_match(provided, &config.sync.shared_secret) {
        return Err(ApiError::Unauthorized);
    }

    let client = IListApiClient::new(&config.ilist.base_url, &config.ilist.api_token);
    let executor = SyncExecutor::new(client, RepositoryStore, config.ilist.batch_size);

    let outcome = executor.run(&request).await?;

    logger::log(
        "sync",
        &format!(
            "Sync session {}: {:?}, {} total, {} created, {} updated, {} failed",
            outcome.session_id,
            outcome.status,
            outcome.properties_total,
            outcome.properties_created,
            outcome.properties_updated,
            outcome.properties_failed
        ),
    );

    Ok(Json(outcome))
}

/// Compare the caller's secret against the configured one without
/// leaking the position of the first mismatching byte through timing.
fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = provided.as_bytes();
    let b = expected.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// GET /api/sync/status
pub async fn status() -> Result<Json<SyncStatusResponse>, ApiError> {
    let config = get_config();

    let last_completed_at = a002_sync_session::service::last_completed_at().await?;
    let recent_sessions = a002_sync_session::service::list_recent(10).await?;

    Ok(Json(SyncStatusResponse {
        ilist_base_url: config.ilist.base_url.clone(),
        default_batch_size: config.ilist.batch_size,
        recommended_schedule: config.sync.recommended_schedule.clone(),
        last_completed_at,
        recent_sessions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secrets_compare_equal() {
        assert!(secrets_match("s3cret", "s3cret"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        assert!(!secrets_match("s3cret", "s3cref"));
        assert!(!secrets_match("s3cre", "s3cret"));
        assert!(!secrets_match("", "s3cret"));
    }
}
