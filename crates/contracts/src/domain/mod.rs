pub mod a001_property;
pub mod a002_sync_session;
pub mod common;
