use serde::{Deserialize, Serialize};

/// Kind of synchronization run being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    /// Fetch every remote record
    Full,
    /// Fetch records changed since the last completed run
    Incremental,
    /// Single active/inactive flag transition
    StatusUpdate,
}

impl SyncType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::Full => "full",
            SyncType::Incremental => "incremental",
            SyncType::StatusUpdate => "status_update",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(SyncType::Full),
            "incremental" => Some(SyncType::Incremental),
            "status_update" => Some(SyncType::StatusUpdate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSessionStatus {
    Running,
    Completed,
    CompletedWithErrors,
    Failed,
}

impl SyncSessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncSessionStatus::Running => "running",
            SyncSessionStatus::Completed => "completed",
            SyncSessionStatus::CompletedWithErrors => "completed_with_errors",
            SyncSessionStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(SyncSessionStatus::Running),
            "completed" => Some(SyncSessionStatus::Completed),
            "completed_with_errors" => Some(SyncSessionStatus::CompletedWithErrors),
            "failed" => Some(SyncSessionStatus::Failed),
            _ => None,
        }
    }
}

/// Persisted log entry describing one synchronization run.
/// Created when the run starts, finalized with totals when it ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSession {
    pub id: String,
    pub sync_type: SyncType,
    pub status: SyncSessionStatus,
    /// Remote records seen by the run
    pub properties_total: i32,
    pub properties_created: i32,
    pub properties_updated: i32,
    pub properties_failed: i32,
    /// Per-action messages accumulated while the run continues past errors
    pub responses: Vec<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}
