use serde::{Deserialize, Serialize};

/// Persisted system log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "server" or "client"
    pub category: String,
    pub message: String,
}

/// DTO for appending a log record over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    pub category: String,
    pub message: String,
}
