pub mod aggregate;

pub use aggregate::{SyncSession, SyncSessionStatus, SyncType};
