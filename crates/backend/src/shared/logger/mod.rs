pub mod repository;

use repository::log_event_internal;

/// Fire-and-forget server-side event log, persisted to `system_log`.
///
/// ```ignore
/// logger::log("sync", "Incremental run started");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}
