use contracts::domain::a002_sync_session::{SyncSession, SyncSessionStatus, SyncType};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_sync_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sync_type: String,
    pub status: String,
    pub properties_total: i32,
    pub properties_created: i32,
    pub properties_updated: i32,
    pub properties_failed: i32,
    /// JSON array of per-action messages
    pub responses: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SyncSession {
    fn from(m: Model) -> Self {
        SyncSession {
            id: m.id,
            sync_type: SyncType::parse(&m.sync_type).unwrap_or(SyncType::Full),
            status: SyncSessionStatus::parse(&m.status).unwrap_or(SyncSessionStatus::Failed),
            properties_total: m.properties_total,
            properties_created: m.properties_created,
            properties_updated: m.properties_updated,
            properties_failed: m.properties_failed,
            responses: serde_json::from_str(&m.responses).unwrap_or_default(),
            started_at: m.started_at,
            finished_at: m.finished_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Open a session row at run start
pub async fn insert_running(id: &str, sync_type: SyncType) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id.to_string()),
        sync_type: Set(sync_type.as_str().to_string()),
        status: Set(SyncSessionStatus::Running.as_str().to_string()),
        properties_total: Set(0),
        properties_created: Set(0),
        properties_updated: Set(0),
        properties_failed: Set(0),
        responses: Set("[]".to_string()),
        started_at: Set(chrono::Utc::now()),
        finished_at: Set(None),
    };
    active.insert(conn()).await?;
    Ok(())
}

/// Close a session with its final status and totals
pub async fn finalize(
    id: &str,
    status: SyncSessionStatus,
    total: i32,
    created: i32,
    updated: i32,
    failed: i32,
    responses: &[String],
) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(id.to_string()),
        status: Set(status.as_str().to_string()),
        properties_total: Set(total),
        properties_created: Set(created),
        properties_updated: Set(updated),
        properties_failed: Set(failed),
        responses: Set(serde_json::to_string(responses)?),
        finished_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<SyncSession>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<SyncSession>> {
    let items: Vec<SyncSession> = Entity::find()
        .order_by_desc(Column::StartedAt)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Completion timestamp of the most recent successful full or incremental
/// run; None when no such run exists (a fresh install syncs from scratch).
pub async fn last_completed_at() -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
    let result = Entity::find()
        .filter(Column::Status.is_in([
            SyncSessionStatus::Completed.as_str(),
            SyncSessionStatus::CompletedWithErrors.as_str(),
        ]))
        .filter(Column::SyncType.is_in([SyncType::Full.as_str(), SyncType::Incremental.as_str()]))
        .order_by_desc(Column::FinishedAt)
        .one(conn())
        .await?;
    Ok(result.and_then(|m| m.finished_at))
}
