use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::media::{CreateMediaRequest, MediaList},
    entity::media::{ActiveModel, Column, Entity as MediaEntity, Model as MediaModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::{Media, Property},
    response::{ApiResponse, Meta, empty_data},
    state::AppState,
};

pub fn media_from_entity(model: MediaModel) -> Media {
    Media {
        id: model.id,
        property_id: model.property_id,
        name: model.name,
        url: model.url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

async fn find_property(state: &AppState, property_id: Uuid) -> AppResult<Property> {
    state
        .properties
        .find_by_id(property_id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_media(state: &AppState, property_id: Uuid) -> AppResult<ApiResponse<MediaList>> {
    find_property(state, property_id).await?;
    let items = MediaEntity::find()
        .filter(Column::PropertyId.eq(property_id))
        .order_by_asc(Column::CreatedAt)
        .all(state.db())
        .await?
        .into_iter()
        .map(media_from_entity)
        .collect();
    Ok(ApiResponse::success("Media", MediaList { items }, None))
}

pub async fn get_media(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Media>> {
    let media = MediaEntity::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Media", media_from_entity(media), None))
}

pub async fn add_media(
    state: &AppState,
    user: &AuthUser,
    property_id: Uuid,
    payload: CreateMediaRequest,
) -> AppResult<ApiResponse<Media>> {
    let property = find_property(state, property_id).await?;
    ensure_owner_or_admin(user, property.owner_id)?;
    if payload.name.trim().is_empty() || payload.url.trim().is_empty() {
        return Err(AppError::BadRequest("name and url are required".into()));
    }

    let media = ActiveModel {
        id: Set(Uuid::new_v4()),
        property_id: Set(property_id),
        name: Set(payload.name),
        url: Set(payload.url),
        created_at: NotSet,
    }
    .insert(state.db())
    .await?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "media_create",
        "media",
        serde_json::json!({ "media_id": media.id, "property_id": property_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Media created",
        media_from_entity(media),
        Some(Meta::empty()),
    ))
}

pub async fn delete_media(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let media = MediaEntity::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    let property = find_property(state, media.property_id).await?;
    ensure_owner_or_admin(user, property.owner_id)?;

    MediaEntity::delete_by_id(id).exec(state.db()).await?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "media_delete",
        "media",
        serde_json::json!({ "media_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", empty_data(), Some(Meta::empty())))
}
