pub mod u501_import_from_file;
pub mod u502_sync_from_ilist;
