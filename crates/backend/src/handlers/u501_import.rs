use axum::extract::{Json, Multipart};

use contracts::usecases::u501_import_from_file::{
    ImportResult, ImportSubmitRequest, ParseResponse, TemplateResponse,
};

use crate::shared::api_error::ApiError;
use crate::shared::logger;
use crate::usecases::u501_import_from_file::{mapping, parser, ImportExecutor, RepositorySink};

/// POST /api/import/parse (multipart)
///
/// Accepts one uploaded file, extracts its table and suggests a column
/// mapping. Nothing is persisted at this stage.
pub async fn parse(mut multipart: Multipart) -> Result<Json<ParseResponse>, ApiError> {
    let mut payload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
            payload = Some((file_name, data.to_vec()));
            break;
        }
    }

    let (file_name, data) =
        payload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let lower = file_name.to_lowercase();
    let table = if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        parser::parse_workbook(&data).map_err(|e| ApiError::BadRequest(e.to_string()))?
    } else {
        let text = String::from_utf8(data)
            .map_err(|_| ApiError::BadRequest("File is not valid UTF-8 text".to_string()))?;
        parser::parse_csv_text(&text).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    tracing::info!(
        "Parsed upload '{}': {} columns, {} rows",
        file_name,
        table.headers.len(),
        table.rows.len()
    );

    let suggested_mapping = mapping::suggest_mapping(&table.headers);

    Ok(Json(ParseResponse {
        file_name,
        table,
        suggested_mapping,
    }))
}

/// POST /api/import/submit
pub async fn submit(
    Json(request): Json<ImportSubmitRequest>,
) -> Result<Json<ImportResult>, ApiError> {
    if request.rows.is_empty() {
        return Err(ApiError::BadRequest("No rows to import".to_string()));
    }

    let executor = ImportExecutor::new(RepositorySink);
    let result = executor.run(request).await;

    logger::log(
        "import",
        &format!(
            "Import {}: {} rows, {} saved, {} failed",
            result.import_id, result.total, result.success, result.failed
        ),
    );

    Ok(Json(result))
}

/// GET /api/import/template
pub async fn template() -> Json<TemplateResponse> {
    Json(TemplateResponse {
        fields: mapping::import_fields(),
        sample_csv: mapping::sample_csv(),
    })
}
