use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit,
    dto::properties::{
        AverageSurfaces, CharacteristicsQuery, PropertiesByType, PropertyList, PropertyListQuery,
        RoomSearchQuery, SurfaceSearchQuery, UpdatePropertyRequest,
    },
    dto::users::CountResponse,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::{Property, PropertyDraft, SurfaceEntry},
    response::{ApiResponse, Meta, empty_data},
    routes::params::split_csv,
    services::property_shaper as shaper,
    state::AppState,
    store::PropertyFilter,
};

pub const DEFAULT_MIN_SURFACE: f64 = 0.0;
pub const DEFAULT_MAX_SURFACE: f64 = 10_000.0;

/// Overlays a partial update on a stored property. A present room list
/// replaces the stored one wholesale.
pub fn apply_update(existing: Property, patch: UpdatePropertyRequest) -> PropertyDraft {
    let mut draft = PropertyDraft::from(existing);
    if let Some(property_type) = patch.property_type {
        draft.property_type = property_type;
    }
    if let Some(status) = patch.status {
        draft.status = status;
    }
    if patch.description.is_some() {
        draft.description = patch.description;
    }
    if patch.location.is_some() {
        draft.location = patch.location;
    }
    if patch.surfaces.is_some() {
        draft.surfaces = patch.surfaces;
    }
    if patch.price.is_some() {
        draft.price = patch.price;
    }
    if let Some(rooms) = patch.rooms {
        draft.rooms = rooms;
    }
    if patch.total_rooms.is_some() {
        draft.total_rooms = patch.total_rooms;
    }
    if patch.levels.is_some() {
        draft.levels = patch.levels;
    }
    if patch.characteristics.is_some() {
        draft.characteristics = patch.characteristics;
    }
    if patch.orientation.is_some() {
        draft.orientation = patch.orientation;
    }
    if patch.heating.is_some() {
        draft.heating = patch.heating;
    }
    if patch.energy.is_some() {
        draft.energy = patch.energy;
    }
    if patch.building.is_some() {
        draft.building = patch.building;
    }
    if patch.energy_diagnostics.is_some() {
        draft.energy_diagnostics = patch.energy_diagnostics;
    }
    if let Some(images) = patch.images {
        draft.images = images;
    }
    draft
}

fn list_filter(query: &PropertyListQuery) -> PropertyFilter {
    PropertyFilter {
        owner_id: query.owner_id,
        property_type: query.property_type.clone(),
        status: query.status.clone(),
    }
}

async fn find_property(state: &AppState, id: Uuid) -> AppResult<Property> {
    state
        .properties
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_property(
    state: &AppState,
    user: &AuthUser,
    draft: PropertyDraft,
) -> AppResult<ApiResponse<Property>> {
    let validated = shaper::prepare(draft)?;
    let property = validated.into_property(Uuid::new_v4(), user.user_id, Utc::now());
    let property = state.properties.insert(property).await?;

    tracing::debug!(
        property_id = %property.id,
        rooms = property.rooms.len(),
        "property created"
    );
    audit::record(
        state.db(),
        Some(user.user_id),
        "property_create",
        "properties",
        serde_json::json!({ "property_id": property.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Property created",
        property,
        Some(Meta::empty()),
    ))
}

pub async fn list_properties(
    state: &AppState,
    query: PropertyListQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let (items, total) = state
        .properties
        .find_page(&list_filter(&query), limit as u64, offset as u64)
        .await?;

    let meta = Meta::new(page, limit, total as i64);
    Ok(ApiResponse::success(
        "Properties",
        PropertyList { items },
        Some(meta),
    ))
}

pub async fn count_properties(
    state: &AppState,
    query: PropertyListQuery,
) -> AppResult<ApiResponse<CountResponse>> {
    let count = state.properties.count(&list_filter(&query)).await?;
    Ok(ApiResponse::success("Properties count", CountResponse { count }, None))
}

pub async fn get_property(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Property>> {
    let property = find_property(state, id).await?;
    Ok(ApiResponse::success("Property", property, None))
}

pub async fn update_property(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    patch: UpdatePropertyRequest,
) -> AppResult<ApiResponse<Property>> {
    let existing = find_property(state, id).await?;
    ensure_owner_or_admin(user, existing.owner_id)?;

    let created_at = existing.created_at;
    let owner_id = existing.owner_id;
    let rooms_replaced = patch.rooms.is_some();
    let validated = shaper::prepare(apply_update(existing, patch))?;

    let mut property = validated.into_property(id, owner_id, Utc::now());
    property.created_at = created_at;
    let property = state.properties.update(property).await?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "property_update",
        "properties",
        serde_json::json!({ "property_id": id, "rooms_replaced": rooms_replaced }),
    )
    .await;

    Ok(ApiResponse::success("Updated", property, Some(Meta::empty())))
}

pub async fn delete_property(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_property(state, id).await?;
    ensure_owner_or_admin(user, existing.owner_id)?;

    if !state.properties.delete(id).await? {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.db(),
        Some(user.user_id),
        "property_delete",
        "properties",
        serde_json::json!({ "property_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", empty_data(), Some(Meta::empty())))
}

pub async fn surfaces_for_display(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<Vec<SurfaceEntry>>> {
    let property = find_property(state, id).await?;
    Ok(ApiResponse::success(
        "Surfaces",
        property.surfaces_for_display(),
        None,
    ))
}

/// Properties with at least `min_count` rooms of the type and, when
/// `min_surface` is given, at least one such room that large.
pub async fn search_by_rooms(
    state: &AppState,
    query: RoomSearchQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    if query.room_type.trim().is_empty() {
        return Err(AppError::BadRequest("room_type is required".into()));
    }
    let all = state.properties.find_all(&PropertyFilter::default()).await?;
    let mut items = shaper::filter_min_rooms(all, &query.room_type, query.min_count.unwrap_or(1));
    if let Some(min_surface) = query.min_surface {
        items = shaper::filter_large_rooms(items, &query.room_type, min_surface);
    }
    Ok(ApiResponse::success("Properties", PropertyList { items }, None))
}

pub async fn search_by_surface(
    state: &AppState,
    query: SurfaceSearchQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    let min = query.min_surface.unwrap_or(DEFAULT_MIN_SURFACE);
    let max = query.max_surface.unwrap_or(DEFAULT_MAX_SURFACE);
    if min > max {
        return Err(AppError::BadRequest(
            "min_surface must not exceed max_surface".into(),
        ));
    }
    let all = state.properties.find_all(&PropertyFilter::default()).await?;
    let items = shaper::filter_surface_range(all, min, max);
    Ok(ApiResponse::success("Properties", PropertyList { items }, None))
}

pub async fn search_by_characteristics(
    state: &AppState,
    query: CharacteristicsQuery,
) -> AppResult<ApiResponse<PropertyList>> {
    let names = split_csv(&query.characteristics);
    let all = state.properties.find_all(&PropertyFilter::default()).await?;
    let items = shaper::filter_characteristics(all, &names);
    Ok(ApiResponse::success("Properties", PropertyList { items }, None))
}

pub async fn properties_by_type(state: &AppState) -> AppResult<ApiResponse<PropertiesByType>> {
    let all = state.properties.find_all(&PropertyFilter::default()).await?;
    Ok(ApiResponse::success(
        "Properties by type",
        PropertiesByType {
            groups: shaper::group_by_type(all),
        },
        None,
    ))
}

pub async fn average_surfaces(state: &AppState) -> AppResult<ApiResponse<AverageSurfaces>> {
    let all = state.properties.find_all(&PropertyFilter::default()).await?;
    Ok(ApiResponse::success(
        "Average surfaces",
        AverageSurfaces {
            averages: shaper::average_surface_by_type(all),
        },
        None,
    ))
}
