use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use contracts::usecases::u501_import_from_file::{
    ImportError, ImportPolicy, ImportResult, ImportSubmitRequest,
};

use super::normalizer::{normalize_row, NormalizedRecord};

/// Persistence target for normalized records. The production sink writes
/// through the property service; tests substitute an in-memory one.
#[async_trait]
pub trait PropertySink: Send + Sync {
    /// Returns true when a new record was created, false when an
    /// existing one was updated.
    async fn upsert(&self, record: NormalizedRecord) -> Result<bool>;
}

pub struct RepositorySink;

#[async_trait]
impl PropertySink for RepositorySink {
    async fn upsert(&self, record: NormalizedRecord) -> Result<bool> {
        crate::domain::a001_property::service::upsert_by_external_id(record.into_dto()).await
    }
}

pub struct ImportExecutor<S: PropertySink> {
    sink: S,
}

impl<S: PropertySink> ImportExecutor<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Run a submitted batch. Every row yields exactly one outcome:
    /// persisted, or listed once in `errors` with its 1-based index.
    pub async fn run(&self, request: ImportSubmitRequest) -> ImportResult {
        let import_id = format!("IMP-{}", Uuid::new_v4());
        let total = request.rows.len();

        let mut errors: Vec<ImportError> = Vec::new();
        let mut warnings: Vec<ImportError> = Vec::new();
        let mut normalized: Vec<(usize, NormalizedRecord)> = Vec::new();

        for (i, row) in request.rows.iter().enumerate() {
            let row_index = i + 1;
            match normalize_row(row, &request.mapping) {
                Ok((record, row_warnings)) => {
                    if !row_warnings.is_empty() {
                        warnings.push(ImportError {
                            row_index,
                            row: row.clone(),
                            messages: row_warnings,
                        });
                    }
                    normalized.push((row_index, record));
                }
                Err(messages) => {
                    errors.push(ImportError {
                        row_index,
                        row: row.clone(),
                        messages,
                    });
                }
            }
        }

        if request.policy == ImportPolicy::AllOrNothing && !errors.is_empty() {
            tracing::warn!(
                "Import {} rejected: {} invalid rows under all-or-nothing policy",
                import_id,
                errors.len()
            );
            return ImportResult {
                total,
                success: 0,
                failed: total,
                import_id,
                errors,
                warnings,
            };
        }

        let mut success = 0usize;
        for (row_index, record) in normalized {
            match self.sink.upsert(record).await {
                Ok(_created) => success += 1,
                Err(e) => {
                    let row = request
                        .rows
                        .get(row_index - 1)
                        .cloned()
                        .unwrap_or_default();
                    errors.push(ImportError {
                        row_index,
                        row,
                        messages: vec![format!("Failed to save: {}", e)],
                    });
                }
            }
        }

        errors.sort_by_key(|e| e.row_index);

        let result = ImportResult {
            total,
            success,
            failed: total - success,
            import_id,
            errors,
            warnings,
        };
        tracing::info!(
            "Import {} finished: {} total, {} saved, {} failed",
            result.import_id,
            result.total,
            result.success,
            result.failed
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_import_from_file::{ImportMapping, RawRow};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingSink {
        calls: AtomicUsize,
        fail_on_title: Option<String>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail_on_title: None }
        }

        fn failing_on(title: &str) -> Self {
            Self { calls: AtomicUsize::new(0), fail_on_title: Some(title.to_string()) }
        }
    }

    #[async_trait]
    impl PropertySink for RecordingSink {
        async fn upsert(&self, record: NormalizedRecord) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_title.as_deref() == Some(record.title.as_str()) {
                anyhow::bail!("database is on fire");
            }
            Ok(true)
        }
    }

    fn mapping() -> ImportMapping {
        ImportMapping {
            title: Some("title".into()),
            price: Some("price".into()),
            ..Default::default()
        }
    }

    fn row(title: &str, price: &str) -> RawRow {
        [("title", title), ("price", price)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn request(rows: Vec<RawRow>, policy: ImportPolicy) -> ImportSubmitRequest {
        ImportSubmitRequest { rows, mapping: mapping(), policy }
    }

    #[tokio::test]
    async fn one_bad_row_out_of_three_yields_one_error() {
        let executor = ImportExecutor::new(RecordingSink::new());
        let result = executor
            .run(request(
                vec![row("A", "100"), row("B", "free"), row("C", "300")],
                ImportPolicy::BestEffort,
            ))
            .await;

        assert_eq!(result.total, 3);
        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row_index, 2);
        assert!(result.import_id.starts_with("IMP-"));
    }

    #[tokio::test]
    async fn success_plus_failed_equals_total() {
        let executor = ImportExecutor::new(RecordingSink::new());
        let result = executor
            .run(request(
                vec![row("A", "1"), row("", "2"), row("C", "x"), row("D", "4")],
                ImportPolicy::BestEffort,
            ))
            .await;
        assert_eq!(result.success + result.failed, result.total);
        assert_eq!(result.errors.len(), result.failed);
    }

    #[tokio::test]
    async fn error_indices_are_one_based_and_increasing() {
        let executor = ImportExecutor::new(RecordingSink::new());
        let result = executor
            .run(request(
                vec![row("", "1"), row("B", "2"), row("", "3")],
                ImportPolicy::BestEffort,
            ))
            .await;
        let indices: Vec<usize> = result.errors.iter().map(|e| e.row_index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_and_the_batch_continues() {
        let executor = ImportExecutor::new(RecordingSink::failing_on("B"));
        let result = executor
            .run(request(
                vec![row("A", "1"), row("B", "2"), row("C", "3")],
                ImportPolicy::BestEffort,
            ))
            .await;

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].row_index, 2);
        assert!(result.errors[0].messages[0].contains("Failed to save"));
    }

    #[tokio::test]
    async fn all_or_nothing_persists_nothing_when_any_row_is_invalid() {
        let sink = RecordingSink::new();
        let executor = ImportExecutor::new(sink);
        let result = executor
            .run(request(
                vec![row("A", "1"), row("B", "bad")],
                ImportPolicy::AllOrNothing,
            ))
            .await;

        assert_eq!(result.success, 0);
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(executor.sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn coercion_warnings_do_not_fail_the_row() {
        let mut mapping = mapping();
        mapping.rooms = Some("rooms".into());
        let mut r = row("A", "100");
        r.insert("rooms".into(), "many".into());

        let executor = ImportExecutor::new(RecordingSink::new());
        let result = executor
            .run(ImportSubmitRequest { rows: vec![r], mapping, policy: ImportPolicy::BestEffort })
            .await;

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].row_index, 1);
    }
}
