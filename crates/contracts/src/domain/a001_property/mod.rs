pub mod aggregate;

pub use aggregate::{Property, PropertyDto, PropertyId};
