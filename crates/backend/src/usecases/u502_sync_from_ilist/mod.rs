//! Pull-based synchronization with the iList CRM.
//!
//! A run opens a sync session, pages through the remote property feed,
//! upserts each record locally keyed by its iList id, and finalizes the
//! session with counters and per-record messages. Scheduling is left to
//! an external cron hitting the trigger endpoint.

pub mod executor;
pub mod ilist_api_client;

pub use executor::{PropertySource, RepositoryStore, SyncExecutor, SyncStore};
pub use ilist_api_client::IListApiClient;
