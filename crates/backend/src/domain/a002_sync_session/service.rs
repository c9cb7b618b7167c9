use super::repository;
use contracts::domain::a002_sync_session::{SyncSession, SyncSessionStatus, SyncType};
use uuid::Uuid;

/// Open a session and return its id
pub async fn start(sync_type: SyncType) -> anyhow::Result<String> {
    let id = Uuid::new_v4().to_string();
    repository::insert_running(&id, sync_type).await?;
    Ok(id)
}

pub async fn finalize(
    id: &str,
    status: SyncSessionStatus,
    total: i32,
    created: i32,
    updated: i32,
    failed: i32,
    responses: &[String],
) -> anyhow::Result<()> {
    repository::finalize(id, status, total, created, updated, failed, responses).await
}

/// Log a single active/inactive transition as a one-shot session
pub async fn record_status_update(property_id: Uuid, active: bool) -> anyhow::Result<String> {
    let id = start(SyncType::StatusUpdate).await?;
    let message = format!(
        "Property {} set {}",
        property_id,
        if active { "active" } else { "inactive" }
    );
    repository::finalize(
        &id,
        SyncSessionStatus::Completed,
        1,
        0,
        1,
        0,
        &[message],
    )
    .await?;
    Ok(id)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<SyncSession>> {
    repository::get_by_id(id).await
}

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<SyncSession>> {
    repository::list_recent(limit).await
}

pub async fn last_completed_at() -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
    repository::last_completed_at().await
}
