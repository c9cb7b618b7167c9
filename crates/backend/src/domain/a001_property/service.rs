use super::repository;
use contracts::domain::a001_property::{Property, PropertyDto};
use uuid::Uuid;

/// Create a new property listing
pub async fn create(dto: PropertyDto) -> anyhow::Result<Uuid> {
    let aggregate = build_for_insert(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    repository::insert(&aggregate).await
}

/// Update an existing property listing
pub async fn update(dto: PropertyDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();
    repository::update(&aggregate).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Property>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Property>> {
    repository::list_all().await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Insert-or-update keyed by the external (iList) identifier.
///
/// Returns true when a new record was created. Records without an external
/// id always insert; two concurrent upserts on the same external id resolve
/// last-writer-wins at the storage layer.
pub async fn upsert_by_external_id(dto: PropertyDto) -> anyhow::Result<bool> {
    let existing = match dto.external_id.as_deref() {
        Some(ext) if !ext.is_empty() => repository::get_by_external_id(ext).await?,
        _ => None,
    };

    match existing {
        Some(mut aggregate) => {
            aggregate.update(&dto);
            aggregate.last_update = Some(chrono::Utc::now());

            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

            aggregate.before_write();
            repository::update(&aggregate).await?;
            Ok(false)
        }
        None => {
            let mut aggregate = build_for_insert(&dto);
            aggregate.last_update = Some(chrono::Utc::now());

            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

            repository::insert(&aggregate).await?;
            Ok(true)
        }
    }
}

/// Flip the active flag; the caller records the sync-session entry
pub async fn set_active(id: Uuid, active: bool) -> anyhow::Result<bool> {
    repository::set_active(id, active).await
}

/// Deactivate the local record matching a remote identifier, if one exists.
/// Returns true when a record was found and deactivated.
pub async fn deactivate_by_external_id(external_id: &str) -> anyhow::Result<bool> {
    match repository::get_by_external_id(external_id).await? {
        Some(aggregate) => repository::set_active(aggregate.base.id.value(), false).await,
        None => Ok(false),
    }
}

fn build_for_insert(dto: &PropertyDto) -> Property {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| match dto.external_id.as_deref() {
            Some(ext) if !ext.is_empty() => format!("PROP-{}", ext),
            _ => format!("PROP-{}", Uuid::new_v4()),
        });

    let mut aggregate = Property::new_for_insert(
        code,
        dto.title.clone(),
        dto.price,
        dto.external_id.clone(),
        dto.comment.clone(),
    );
    aggregate.sqr_meters = dto.sqr_meters;
    aggregate.rooms = dto.rooms;
    aggregate.bathrooms = dto.bathrooms;
    aggregate.building_year = dto.building_year;
    aggregate.latitude = dto.latitude;
    aggregate.longitude = dto.longitude;
    aggregate.area_id = dto.area_id;
    aggregate.subarea_id = dto.subarea_id;
    aggregate.energy_class_id = dto.energy_class_id;
    aggregate.postal_code = dto.postal_code;
    aggregate
}
