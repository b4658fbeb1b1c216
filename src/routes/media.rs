use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::Media,
    response::ApiResponse,
    services::media_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_media).delete(delete_media))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    params(
        ("id" = Uuid, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Get media", body = ApiResponse<Media>),
        (status = 404, description = "Media not found"),
    ),
    tag = "Media"
)]
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Media>>> {
    let resp = media_service::get_media(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    params(
        ("id" = Uuid, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Deleted media", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owner of the property"),
        (status = 404, description = "Media not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
pub async fn delete_media(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = media_service::delete_media(&state, &user, id).await?;
    Ok(Json(resp))
}
