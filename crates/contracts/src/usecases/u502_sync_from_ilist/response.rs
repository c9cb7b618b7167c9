use crate::domain::a002_sync_session::{SyncSession, SyncSessionStatus};
use serde::{Deserialize, Serialize};

/// Aggregate counts of one finished (or failed) sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub session_id: String,
    pub status: SyncSessionStatus,
    pub properties_total: i32,
    pub properties_created: i32,
    pub properties_updated: i32,
    pub properties_failed: i32,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

/// Current sync configuration plus run history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatusResponse {
    pub ilist_base_url: String,
    pub default_batch_size: u32,
    /// Human-readable advice for the external scheduler
    pub recommended_schedule: String,
    pub last_completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub recent_sessions: Vec<SyncSession>,
}
