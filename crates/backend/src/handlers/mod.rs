pub mod a001_property;
pub mod a002_sync_session;
pub mod logs;
pub mod u501_import;
pub mod u502_sync;
