pub mod request;
pub mod response;

pub use request::{SyncMode, SyncTriggerRequest};
pub use response::{SyncOutcome, SyncStatusResponse};
