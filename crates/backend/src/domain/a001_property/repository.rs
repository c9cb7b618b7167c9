use chrono::Utc;
use contracts::domain::a001_property::{Property, PropertyId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_property")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub price: f64,
    pub sqr_meters: Option<f64>,
    pub rooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub building_year: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_id: Option<i32>,
    pub subarea_id: Option<i32>,
    pub energy_class_id: Option<i32>,
    pub postal_code: Option<i32>,
    pub external_id: Option<String>,
    pub is_active: bool,
    pub last_update: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Property {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Property {
            base: BaseAggregate::with_metadata(
                PropertyId(uuid),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            price: m.price,
            sqr_meters: m.sqr_meters,
            rooms: m.rooms,
            bathrooms: m.bathrooms,
            building_year: m.building_year,
            latitude: m.latitude,
            longitude: m.longitude,
            area_id: m.area_id,
            subarea_id: m.subarea_id,
            energy_class_id: m.energy_class_id,
            postal_code: m.postal_code,
            external_id: m.external_id,
            is_active: m.is_active,
            last_update: m.last_update,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Property) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        price: Set(aggregate.price),
        sqr_meters: Set(aggregate.sqr_meters),
        rooms: Set(aggregate.rooms),
        bathrooms: Set(aggregate.bathrooms),
        building_year: Set(aggregate.building_year),
        latitude: Set(aggregate.latitude),
        longitude: Set(aggregate.longitude),
        area_id: Set(aggregate.area_id),
        subarea_id: Set(aggregate.subarea_id),
        energy_class_id: Set(aggregate.energy_class_id),
        postal_code: Set(aggregate.postal_code),
        external_id: Set(aggregate.external_id.clone()),
        is_active: Set(aggregate.is_active),
        last_update: Set(aggregate.last_update),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Property>> {
    let mut items: Vec<Property> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Property>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_external_id(external_id: &str) -> anyhow::Result<Option<Property>> {
    let result = Entity::find()
        .filter(Column::ExternalId.eq(external_id))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Property) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Property) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn set_active(id: Uuid, active: bool) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(active))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
