pub mod request;
pub mod response;

pub use request::{ImportMapping, ImportPolicy, ImportSubmitRequest, RawRow};
pub use response::{
    ImportError, ImportField, ImportResult, ParseResponse, ParsedTable, TemplateResponse,
};
