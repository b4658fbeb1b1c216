//! Storage contract for properties.
//!
//! Services receive a `dyn PropertyStore` through [`crate::state::AppState`]
//! instead of reaching for the ORM directly, so the listing logic can run
//! against Postgres or against memory.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entity::properties::{ActiveModel, Column, Entity as Properties, Model as PropertyModel},
    error::{AppError, AppResult},
    models::Property,
};

#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub owner_id: Option<Uuid>,
    pub property_type: Option<String>,
    pub status: Option<String>,
}

impl PropertyFilter {
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// Blank strings do not filter, matching the SQL condition.
    pub fn matches(&self, property: &Property) -> bool {
        self.owner_id.is_none_or(|id| property.owner_id == id)
            && non_blank(&self.property_type).is_none_or(|t| property.property_type == t)
            && non_blank(&self.status).is_none_or(|s| property.status == s)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert(&self, property: Property) -> AppResult<Property>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>>;

    async fn find_all(&self, filter: &PropertyFilter) -> AppResult<Vec<Property>>;

    /// One page, newest first, with the total number of matches.
    async fn find_page(
        &self,
        filter: &PropertyFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<Property>, u64)>;

    async fn count(&self, filter: &PropertyFilter) -> AppResult<u64>;

    async fn update(&self, property: Property) -> AppResult<Property>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SeaOrmPropertyStore {
    orm: Arc<DatabaseConnection>,
}

impl SeaOrmPropertyStore {
    pub fn new(orm: Arc<DatabaseConnection>) -> Self {
        Self { orm }
    }

    fn conn(&self) -> &DatabaseConnection {
        &self.orm
    }
}

fn condition(filter: &PropertyFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(owner_id) = filter.owner_id {
        condition = condition.add(Column::OwnerId.eq(owner_id));
    }
    if let Some(property_type) = non_blank(&filter.property_type) {
        condition = condition.add(Column::PropertyType.eq(property_type));
    }
    if let Some(status) = non_blank(&filter.status) {
        condition = condition.add(Column::Status.eq(status));
    }
    condition
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("encode embedded record: {e}")))
}

fn to_json_opt<T: Serialize>(value: &Option<T>) -> AppResult<Option<Value>> {
    value.as_ref().map(to_json).transpose()
}

fn from_json<T: DeserializeOwned>(column: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("decode properties.{column}: {e}")))
}

fn from_json_opt<T: DeserializeOwned>(column: &str, value: Option<Value>) -> AppResult<Option<T>> {
    value.map(|v| from_json(column, v)).transpose()
}

pub fn property_from_entity(model: PropertyModel) -> AppResult<Property> {
    Ok(Property {
        id: model.id,
        owner_id: model.owner_id,
        property_type: model.property_type,
        status: model.status,
        description: from_json("description", model.description)?,
        location: from_json("location", model.location)?,
        surfaces: from_json("surfaces", model.surfaces)?,
        price: from_json("price", model.price)?,
        rooms: from_json("rooms", model.rooms)?,
        total_rooms: model.total_rooms,
        levels: model.levels,
        characteristics: from_json_opt("characteristics", model.characteristics)?,
        orientation: from_json_opt("orientation", model.orientation)?,
        heating: from_json_opt("heating", model.heating)?,
        energy: from_json_opt("energy", model.energy)?,
        building: from_json_opt("building", model.building)?,
        energy_diagnostics: from_json_opt("energy_diagnostics", model.energy_diagnostics)?,
        images: from_json("images", model.images)?,
        published_at: model.published_at.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn active_from_property(property: &Property) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(property.id),
        owner_id: Set(property.owner_id),
        property_type: Set(property.property_type.clone()),
        status: Set(property.status.clone()),
        description: Set(to_json(&property.description)?),
        location: Set(to_json(&property.location)?),
        surfaces: Set(to_json(&property.surfaces)?),
        price: Set(to_json(&property.price)?),
        rooms: Set(to_json(&property.rooms)?),
        total_rooms: Set(property.total_rooms),
        levels: Set(property.levels),
        characteristics: Set(to_json_opt(&property.characteristics)?),
        orientation: Set(to_json_opt(&property.orientation)?),
        heating: Set(to_json_opt(&property.heating)?),
        energy: Set(to_json_opt(&property.energy)?),
        building: Set(to_json_opt(&property.building)?),
        energy_diagnostics: Set(to_json_opt(&property.energy_diagnostics)?),
        images: Set(to_json(&property.images)?),
        published_at: Set(property.published_at.fixed_offset()),
        created_at: Set(property.created_at.fixed_offset()),
        updated_at: Set(property.updated_at.fixed_offset()),
    })
}

#[async_trait]
impl PropertyStore for SeaOrmPropertyStore {
    async fn insert(&self, property: Property) -> AppResult<Property> {
        let model = active_from_property(&property)?.insert(self.conn()).await?;
        property_from_entity(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        Properties::find_by_id(id)
            .one(self.conn())
            .await?
            .map(property_from_entity)
            .transpose()
    }

    async fn find_all(&self, filter: &PropertyFilter) -> AppResult<Vec<Property>> {
        Properties::find()
            .filter(condition(filter))
            .order_by_desc(Column::CreatedAt)
            .all(self.conn())
            .await?
            .into_iter()
            .map(property_from_entity)
            .collect()
    }

    async fn find_page(
        &self,
        filter: &PropertyFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<Property>, u64)> {
        let finder = Properties::find()
            .filter(condition(filter))
            .order_by_desc(Column::CreatedAt);
        let total = finder.clone().count(self.conn()).await?;
        let items = finder
            .limit(limit)
            .offset(offset)
            .all(self.conn())
            .await?
            .into_iter()
            .map(property_from_entity)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn count(&self, filter: &PropertyFilter) -> AppResult<u64> {
        Ok(Properties::find()
            .filter(condition(filter))
            .count(self.conn())
            .await?)
    }

    async fn update(&self, property: Property) -> AppResult<Property> {
        let mut active = active_from_property(&property)?;
        active.created_at = sea_orm::ActiveValue::NotSet;
        let model = active.update(self.conn()).await?;
        property_from_entity(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Properties::delete_by_id(id).exec(self.conn()).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Process-local store, newest insert first. Used by tests and tooling that
/// has no database at hand.
#[derive(Default)]
pub struct InMemoryPropertyStore {
    rows: RwLock<Vec<Property>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, Vec<Property>>> {
        self.rows
            .read()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("property store lock poisoned")))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, Vec<Property>>> {
        self.rows
            .write()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("property store lock poisoned")))
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn insert(&self, property: Property) -> AppResult<Property> {
        let mut rows = self.write()?;
        if rows.iter().any(|p| p.id == property.id) {
            return Err(AppError::Conflict(format!("property {} exists", property.id)));
        }
        rows.insert(0, property.clone());
        Ok(property)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        Ok(self.read()?.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self, filter: &PropertyFilter) -> AppResult<Vec<Property>> {
        Ok(self
            .read()?
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_page(
        &self,
        filter: &PropertyFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<Property>, u64)> {
        let all = self.find_all(filter).await?;
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn count(&self, filter: &PropertyFilter) -> AppResult<u64> {
        Ok(self.read()?.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn update(&self, property: Property) -> AppResult<Property> {
        let mut rows = self.write()?;
        let slot = rows
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or(AppError::NotFound)?;
        *slot = property.clone();
        Ok(property)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.write()?;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}
