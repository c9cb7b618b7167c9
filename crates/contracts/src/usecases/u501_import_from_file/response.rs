use super::request::{ImportMapping, RawRow};
use serde::{Deserialize, Serialize};

/// Tabular data extracted from an uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTable {
    /// Header names in file order; blank headers become "Column N"
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Response of the parse endpoint: the table plus an advisory mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    pub file_name: String,
    #[serde(flatten)]
    pub table: ParsedTable,
    pub suggested_mapping: ImportMapping,
}

/// Validation or persistence failure for a single row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportError {
    /// 1-based position of the row in the submitted batch
    pub row_index: usize,
    pub row: RawRow,
    pub messages: Vec<String>,
}

/// Aggregate outcome of one import request.
/// Invariant: `success + failed == total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub import_id: String,
    /// Failures, ordered by ascending row index
    pub errors: Vec<ImportError>,
    /// Optional-field coercion notes for rows that still imported
    pub warnings: Vec<ImportError>,
}

/// One importable field of the target schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportField {
    pub name: String,
    pub required: bool,
}

/// Response of the template endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub fields: Vec<ImportField>,
    pub sample_csv: String,
}
