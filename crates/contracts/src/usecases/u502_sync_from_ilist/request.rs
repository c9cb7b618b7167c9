use serde::{Deserialize, Serialize};

/// Requested scope of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every remote record
    Full,
    /// Records changed since the last completed run of either kind.
    /// Falls back to a full fetch when no completed run exists.
    #[default]
    Incremental,
}

/// Body of the scheduled sync trigger endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTriggerRequest {
    #[serde(default)]
    pub mode: SyncMode,
    /// Also fetch records the CRM marks deleted, deactivating them locally
    #[serde(default)]
    pub include_deleted: bool,
    /// Page size override; falls back to the configured default
    #[serde(default)]
    pub batch_size: Option<u32>,
}
