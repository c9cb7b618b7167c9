use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use contracts::domain::a001_property::PropertyDto;
use contracts::domain::a002_sync_session::{SyncSessionStatus, SyncType};
use contracts::usecases::u502_sync_from_ilist::{SyncMode, SyncOutcome, SyncTriggerRequest};

use crate::domain::{a001_property, a002_sync_session};

use super::ilist_api_client::{map_remote_property, IListApiClient, IListPage};

/// Paged view of the remote feed. The production source is the HTTP
/// client; tests substitute a scripted one.
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn fetch_properties(
        &self,
        page: u32,
        page_size: u32,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    ) -> Result<IListPage>;
}

#[async_trait]
impl PropertySource for IListApiClient {
    async fn fetch_properties(
        &self,
        page: u32,
        page_size: u32,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    ) -> Result<IListPage> {
        IListApiClient::fetch_properties(self, page, page_size, since, include_deleted).await
    }
}

/// Local side of a run: session bookkeeping plus property writes.
/// The production store goes through the domain services.
#[async_trait]
pub trait SyncStore: Send + Sync {
    async fn last_completed_at(&self) -> Result<Option<DateTime<Utc>>>;

    async fn start_session(&self, sync_type: SyncType) -> Result<String>;

    #[allow(clippy::too_many_arguments)]
    async fn finalize_session(
        &self,
        session_id: &str,
        status: SyncSessionStatus,
        total: i32,
        created: i32,
        updated: i32,
        failed: i32,
        responses: &[String],
    ) -> Result<()>;

    /// Returns true when a new record was created, false when an
    /// existing one was updated.
    async fn upsert(&self, dto: PropertyDto) -> Result<bool>;

    /// Returns true when a matching local record was deactivated
    async fn deactivate(&self, external_id: &str) -> Result<bool>;
}

pub struct RepositoryStore;

#[async_trait]
impl SyncStore for RepositoryStore {
    async fn last_completed_at(&self) -> Result<Option<DateTime<Utc>>> {
        a002_sync_session::service::last_completed_at().await
    }

    async fn start_session(&self, sync_type: SyncType) -> Result<String> {
        a002_sync_session::service::start(sync_type).await
    }

    async fn finalize_session(
        &self,
        session_id: &str,
        status: SyncSessionStatus,
        total: i32,
        created: i32,
        updated: i32,
        failed: i32,
        responses: &[String],
    ) -> Result<()> {
        a002_sync_session::service::finalize(
            session_id, status, total, created, updated, failed, responses,
        )
        .await
    }

    async fn upsert(&self, dto: PropertyDto) -> Result<bool> {
        a001_property::service::upsert_by_external_id(dto).await
    }

    async fn deactivate(&self, external_id: &str) -> Result<bool> {
        a001_property::service::deactivate_by_external_id(external_id).await
    }
}

/// Drives one sync run end to end: session bookkeeping, paging,
/// per-record upserts. One executor instance per run.
pub struct SyncExecutor<C: PropertySource, S: SyncStore> {
    source: C,
    store: S,
    default_batch_size: u32,
}

impl<C: PropertySource, S: SyncStore> SyncExecutor<C, S> {
    pub fn new(source: C, store: S, default_batch_size: u32) -> Self {
        Self {
            source,
            store,
            default_batch_size,
        }
    }

    pub async fn run(&self, request: &SyncTriggerRequest) -> Result<SyncOutcome> {
        let sync_type = match request.mode {
            SyncMode::Full => SyncType::Full,
            SyncMode::Incremental => SyncType::Incremental,
        };
        let batch_size = request.batch_size.unwrap_or(self.default_batch_size).max(1);

        // No prior completed run means there is no safe lower bound, so
        // the first incremental run fetches everything.
        let since = match request.mode {
            SyncMode::Full => None,
            SyncMode::Incremental => self.store.last_completed_at().await?,
        };

        let session_id = self.store.start_session(sync_type).await?;
        tracing::info!(
            "Sync session {} started: {} mode, batch size {}, since {:?}",
            session_id,
            sync_type.as_str(),
            batch_size,
            since
        );

        match self.pull_pages(batch_size, since, request.include_deleted).await {
            Ok(tally) => {
                let status = if tally.failed > 0 {
                    SyncSessionStatus::CompletedWithErrors
                } else {
                    SyncSessionStatus::Completed
                };
                self.store
                    .finalize_session(
                        &session_id,
                        status,
                        tally.total,
                        tally.created,
                        tally.updated,
                        tally.failed,
                        &tally.responses,
                    )
                    .await?;
                tracing::info!(
                    "Sync session {} finished: {} total, {} created, {} updated, {} failed",
                    session_id,
                    tally.total,
                    tally.created,
                    tally.updated,
                    tally.failed
                );
                Ok(SyncOutcome {
                    session_id,
                    status,
                    properties_total: tally.total,
                    properties_created: tally.created,
                    properties_updated: tally.updated,
                    properties_failed: tally.failed,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                // Fetch failures abort the run rather than risking a
                // half-applied page being mistaken for a completed sync.
                let message = format!("Fetch failed: {}", e);
                tracing::error!("Sync session {} aborted: {}", session_id, message);
                self.store
                    .finalize_session(&session_id, SyncSessionStatus::Failed, 0, 0, 0, 0, &[message])
                    .await?;
                Err(e)
            }
        }
    }

    async fn pull_pages(
        &self,
        batch_size: u32,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    ) -> Result<SyncTally> {
        let mut tally = SyncTally::default();
        let mut page = 1u32;

        loop {
            let fetched = self
                .source
                .fetch_properties(page, batch_size, since, include_deleted)
                .await?;
            let fetched_count = fetched.items.len();

            for remote in &fetched.items {
                tally.total += 1;

                if remote.is_deleted {
                    match self.store.deactivate(&remote.id).await {
                        Ok(true) => {
                            tally.updated += 1;
                            tally
                                .responses
                                .push(format!("{}: deactivated (deleted remotely)", remote.id));
                        }
                        Ok(false) => {
                            tally
                                .responses
                                .push(format!("{}: deleted remotely, no local record", remote.id));
                        }
                        Err(e) => {
                            tally.failed += 1;
                            tally.responses.push(format!("{}: {}", remote.id, e));
                        }
                    }
                    continue;
                }

                let dto = map_remote_property(remote);
                match self.store.upsert(dto).await {
                    Ok(true) => tally.created += 1,
                    Ok(false) => tally.updated += 1,
                    Err(e) => {
                        tally.failed += 1;
                        tally.responses.push(format!("{}: {}", remote.id, e));
                    }
                }
            }

            if fetched_count < batch_size as usize || tally.total as u32 >= fetched.total_count {
                break;
            }
            page += 1;
        }

        Ok(tally)
    }
}

#[derive(Debug, Default)]
struct SyncTally {
    total: i32,
    created: i32,
    updated: i32,
    failed: i32,
    responses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::ilist_api_client::IListProperty;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct FetchCall {
        page: u32,
        page_size: u32,
        since: Option<DateTime<Utc>>,
        include_deleted: bool,
    }

    struct ScriptedSource {
        pages: Mutex<Vec<IListPage>>,
        calls: Mutex<Vec<FetchCall>>,
        fail: bool,
    }

    impl ScriptedSource {
        fn new(pages: Vec<IListPage>) -> Self {
            Self { pages: Mutex::new(pages), calls: Mutex::new(Vec::new()), fail: false }
        }

        fn failing() -> Self {
            Self { pages: Mutex::new(Vec::new()), calls: Mutex::new(Vec::new()), fail: true }
        }

        fn calls(&self) -> Vec<FetchCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PropertySource for ScriptedSource {
        async fn fetch_properties(
            &self,
            page: u32,
            page_size: u32,
            since: Option<DateTime<Utc>>,
            include_deleted: bool,
        ) -> Result<IListPage> {
            self.calls.lock().unwrap().push(FetchCall { page, page_size, since, include_deleted });
            if self.fail {
                anyhow::bail!("connection refused");
            }
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(IListPage { items: Vec::new(), total_count: 0 })
            } else {
                Ok(pages.remove(0))
            }
        }
    }

    struct FakeStore {
        last: Option<DateTime<Utc>>,
        fail_on_external_id: Option<String>,
        upserts: Mutex<Vec<String>>,
        deactivations: Mutex<Vec<String>>,
        finalized: Mutex<Option<(SyncSessionStatus, i32, i32, i32, i32, Vec<String>)>>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                last: None,
                fail_on_external_id: None,
                upserts: Mutex::new(Vec::new()),
                deactivations: Mutex::new(Vec::new()),
                finalized: Mutex::new(None),
            }
        }

        fn with_last_completed_at(at: DateTime<Utc>) -> Self {
            Self { last: Some(at), ..Self::new() }
        }

        fn failing_on(external_id: &str) -> Self {
            Self { fail_on_external_id: Some(external_id.to_string()), ..Self::new() }
        }

        fn finalized(&self) -> (SyncSessionStatus, i32, i32, i32, i32, Vec<String>) {
            self.finalized.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl SyncStore for FakeStore {
        async fn last_completed_at(&self) -> Result<Option<DateTime<Utc>>> {
            Ok(self.last)
        }

        async fn start_session(&self, _sync_type: SyncType) -> Result<String> {
            Ok("S-1".to_string())
        }

        async fn finalize_session(
            &self,
            _session_id: &str,
            status: SyncSessionStatus,
            total: i32,
            created: i32,
            updated: i32,
            failed: i32,
            responses: &[String],
        ) -> Result<()> {
            *self.finalized.lock().unwrap() =
                Some((status, total, created, updated, failed, responses.to_vec()));
            Ok(())
        }

        async fn upsert(&self, dto: PropertyDto) -> Result<bool> {
            let external_id = dto.external_id.unwrap_or_default();
            if self.fail_on_external_id.as_deref() == Some(external_id.as_str()) {
                anyhow::bail!("database is on fire");
            }
            self.upserts.lock().unwrap().push(external_id);
            Ok(true)
        }

        async fn deactivate(&self, external_id: &str) -> Result<bool> {
            self.deactivations.lock().unwrap().push(external_id.to_string());
            Ok(true)
        }
    }

    fn remote(id: &str) -> IListProperty {
        IListProperty {
            id: id.to_string(),
            title: format!("Listing {}", id),
            price: 100000.0,
            sqr_meters: None,
            rooms: None,
            bathrooms: None,
            construction_year: None,
            latitude: None,
            longitude: None,
            area_id: None,
            subarea_id: None,
            energy_class_id: None,
            postal_code: None,
            is_deleted: false,
            modified_at: None,
        }
    }

    fn deleted_remote(id: &str) -> IListProperty {
        IListProperty { is_deleted: true, ..remote(id) }
    }

    fn page(items: Vec<IListProperty>, total_count: u32) -> IListPage {
        IListPage { items, total_count }
    }

    fn incremental() -> SyncTriggerRequest {
        SyncTriggerRequest {
            mode: SyncMode::Incremental,
            include_deleted: false,
            batch_size: None,
        }
    }

    #[tokio::test]
    async fn first_incremental_run_fetches_unbounded() {
        let source = ScriptedSource::new(vec![page(vec![remote("IL-1")], 1)]);
        let executor = SyncExecutor::new(source, FakeStore::new(), 50);

        executor.run(&incremental()).await.unwrap();

        let calls = executor.source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].since, None);
    }

    #[tokio::test]
    async fn incremental_run_is_bounded_by_the_last_completed_session() {
        let at = Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap();
        let source = ScriptedSource::new(vec![page(vec![remote("IL-1")], 1)]);
        let executor = SyncExecutor::new(source, FakeStore::with_last_completed_at(at), 50);

        executor.run(&incremental()).await.unwrap();

        assert_eq!(executor.source.calls()[0].since, Some(at));
    }

    #[tokio::test]
    async fn full_run_ignores_prior_sessions() {
        let at = Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap();
        let source = ScriptedSource::new(vec![page(vec![remote("IL-1")], 1)]);
        let executor = SyncExecutor::new(source, FakeStore::with_last_completed_at(at), 50);

        let request = SyncTriggerRequest {
            mode: SyncMode::Full,
            include_deleted: false,
            batch_size: None,
        };
        executor.run(&request).await.unwrap();

        assert_eq!(executor.source.calls()[0].since, None);
    }

    #[tokio::test]
    async fn pages_until_the_remote_total_is_reached() {
        let source = ScriptedSource::new(vec![
            page(vec![remote("IL-1"), remote("IL-2")], 3),
            page(vec![remote("IL-3")], 3),
        ]);
        let request = SyncTriggerRequest {
            mode: SyncMode::Incremental,
            include_deleted: false,
            batch_size: Some(2),
        };
        let executor = SyncExecutor::new(source, FakeStore::new(), 50);

        let outcome = executor.run(&request).await.unwrap();

        let calls = executor.source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].page, 1);
        assert_eq!(calls[1].page, 2);
        assert_eq!(calls[0].page_size, 2);
        assert_eq!(outcome.properties_total, 3);
        assert_eq!(outcome.properties_created, 3);
        assert_eq!(outcome.status, SyncSessionStatus::Completed);
    }

    #[tokio::test]
    async fn record_failure_is_counted_and_the_run_continues() {
        let source = ScriptedSource::new(vec![page(
            vec![remote("IL-1"), remote("IL-2"), remote("IL-3")],
            3,
        )]);
        let executor = SyncExecutor::new(source, FakeStore::failing_on("IL-2"), 50);

        let outcome = executor.run(&incremental()).await.unwrap();

        assert_eq!(outcome.status, SyncSessionStatus::CompletedWithErrors);
        assert_eq!(outcome.properties_created, 2);
        assert_eq!(outcome.properties_failed, 1);
        let (status, total, _, _, failed, responses) = executor.store.finalized();
        assert_eq!(status, SyncSessionStatus::CompletedWithErrors);
        assert_eq!(total, 3);
        assert_eq!(failed, 1);
        assert!(responses[0].starts_with("IL-2:"));
    }

    #[tokio::test]
    async fn remotely_deleted_record_deactivates_the_local_one() {
        let source = ScriptedSource::new(vec![page(vec![remote("IL-1"), deleted_remote("IL-2")], 2)]);
        let request = SyncTriggerRequest {
            mode: SyncMode::Incremental,
            include_deleted: true,
            batch_size: None,
        };
        let executor = SyncExecutor::new(source, FakeStore::new(), 50);

        let outcome = executor.run(&request).await.unwrap();

        assert!(executor.source.calls()[0].include_deleted);
        assert_eq!(*executor.store.deactivations.lock().unwrap(), vec!["IL-2"]);
        assert_eq!(*executor.store.upserts.lock().unwrap(), vec!["IL-1"]);
        assert_eq!(outcome.properties_updated, 1);
    }

    #[tokio::test]
    async fn fetch_failure_finalizes_the_session_as_failed() {
        let executor = SyncExecutor::new(ScriptedSource::failing(), FakeStore::new(), 50);

        let result = executor.run(&incremental()).await;

        assert!(result.is_err());
        let (status, total, _, _, _, responses) = executor.store.finalized();
        assert_eq!(status, SyncSessionStatus::Failed);
        assert_eq!(total, 0);
        assert!(responses[0].starts_with("Fetch failed:"));
    }

    #[test]
    fn trigger_request_defaults_to_incremental() {
        let request: SyncTriggerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.mode, SyncMode::Incremental);
        assert!(!request.include_deleted);
        assert_eq!(request.batch_size, None);
    }
}
