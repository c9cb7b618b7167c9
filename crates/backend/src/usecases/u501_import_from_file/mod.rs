//! Tabular property import: parse an uploaded file, map its columns onto
//! the property schema, validate row by row and upsert the survivors.

pub mod executor;
pub mod mapping;
pub mod normalizer;
pub mod parser;

pub use executor::{ImportExecutor, PropertySink, RepositorySink};
