use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        media::{CreateMediaRequest, MediaList},
        properties::{
            AverageSurfaces, CharacteristicsQuery, PropertiesByType, PropertyList,
            PropertyListQuery, RoomSearchQuery, SurfaceSearchQuery, UpdatePropertyRequest,
        },
        users::CountResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Media, Property, PropertyDraft, SurfaceEntry},
    response::ApiResponse,
    services::{media_service, property_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route("/count", get(count_properties))
        .route("/search/rooms", get(search_by_rooms))
        .route("/search/surface", get(search_by_surface))
        .route("/search/characteristics", get(search_by_characteristics))
        .route("/statistics/types", get(properties_by_type))
        .route("/statistics/average-surfaces", get(average_surfaces))
        .route(
            "/{id}",
            get(get_property)
                .patch(update_property)
                .delete(delete_property),
        )
        .route("/{id}/surfaces", get(get_surfaces))
        .route("/{id}/media", get(list_media).post(add_media))
}

#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyListQuery),
    responses(
        (status = 200, description = "List properties", body = ApiResponse<PropertyList>)
    ),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyListQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::list_properties(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/count",
    params(PropertyListQuery),
    responses(
        (status = 200, description = "Count properties", body = ApiResponse<CountResponse>)
    ),
    tag = "Properties"
)]
pub async fn count_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyListQuery>,
) -> AppResult<Json<ApiResponse<CountResponse>>> {
    let resp = property_service::count_properties(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Get property", body = ApiResponse<Property>),
        (status = 404, description = "Property not found"),
    ),
    tag = "Properties"
)]
pub async fn get_property(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::get_property(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = PropertyDraft,
    responses(
        (status = 200, description = "Create property", body = ApiResponse<Property>),
        (status = 400, description = "Validation failed, every violation listed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PropertyDraft>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::create_property(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Updated property", body = ApiResponse<Property>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let resp = property_service::update_property(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Deleted property", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = property_service::delete_property(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}/surfaces",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Surfaces formatted for display", body = ApiResponse<Vec<SurfaceEntry>>),
        (status = 404, description = "Property not found"),
    ),
    tag = "Properties"
)]
pub async fn get_surfaces(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<SurfaceEntry>>>> {
    let resp = property_service::surfaces_for_display(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/search/rooms",
    params(RoomSearchQuery),
    responses(
        (status = 200, description = "Properties matching room criteria", body = ApiResponse<PropertyList>)
    ),
    tag = "Properties"
)]
pub async fn search_by_rooms(
    State(state): State<AppState>,
    Query(query): Query<RoomSearchQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::search_by_rooms(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/search/surface",
    params(SurfaceSearchQuery),
    responses(
        (status = 200, description = "Properties within a habitable surface range", body = ApiResponse<PropertyList>)
    ),
    tag = "Properties"
)]
pub async fn search_by_surface(
    State(state): State<AppState>,
    Query(query): Query<SurfaceSearchQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::search_by_surface(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/search/characteristics",
    params(CharacteristicsQuery),
    responses(
        (status = 200, description = "Properties having every listed characteristic", body = ApiResponse<PropertyList>)
    ),
    tag = "Properties"
)]
pub async fn search_by_characteristics(
    State(state): State<AppState>,
    Query(query): Query<CharacteristicsQuery>,
) -> AppResult<Json<ApiResponse<PropertyList>>> {
    let resp = property_service::search_by_characteristics(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/statistics/types",
    responses(
        (status = 200, description = "Properties grouped by type", body = ApiResponse<PropertiesByType>)
    ),
    tag = "Properties"
)]
pub async fn properties_by_type(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PropertiesByType>>> {
    let resp = property_service::properties_by_type(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/statistics/average-surfaces",
    responses(
        (status = 200, description = "Average habitable surface per type", body = ApiResponse<AverageSurfaces>)
    ),
    tag = "Properties"
)]
pub async fn average_surfaces(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AverageSurfaces>>> {
    let resp = property_service::average_surfaces(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}/media",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Media of a property", body = ApiResponse<MediaList>),
        (status = 404, description = "Property not found"),
    ),
    tag = "Media"
)]
pub async fn list_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MediaList>>> {
    let resp = media_service::list_media(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/properties/{id}/media",
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    request_body = CreateMediaRequest,
    responses(
        (status = 200, description = "Media attached", body = ApiResponse<Media>),
        (status = 403, description = "Not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
pub async fn add_media(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMediaRequest>,
) -> AppResult<Json<ApiResponse<Media>>> {
    let resp = media_service::add_media(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
