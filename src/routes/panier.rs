use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::panier::{
        AddToPanierRequest, AddToPanierResponse, PanierList, PanierView, UpdatePanierItemRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::BienPanier,
    response::ApiResponse,
    routes::params::Pagination,
    services::panier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_panier))
        .route("/items", post(add_to_panier))
        .route(
            "/items/{id}",
            patch(update_item_status).delete(remove_from_panier),
        )
}

#[utoipa::path(
    get,
    path = "/api/panier",
    responses(
        (status = 200, description = "The caller's panier with its properties", body = ApiResponse<PanierView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Panier"
)]
pub async fn get_panier(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PanierView>>> {
    let resp = panier_service::get_panier(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/panier/items",
    request_body = AddToPanierRequest,
    responses(
        (status = 200, description = "Property added to panier", body = ApiResponse<AddToPanierResponse>),
        (status = 400, description = "Property not found"),
        (status = 409, description = "Property already in panier"),
    ),
    security(("bearer_auth" = [])),
    tag = "Panier"
)]
pub async fn add_to_panier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToPanierRequest>,
) -> AppResult<Json<ApiResponse<AddToPanierResponse>>> {
    let resp = panier_service::add_to_panier(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/panier/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Panier item ID")
    ),
    request_body = UpdatePanierItemRequest,
    responses(
        (status = 200, description = "Request status updated", body = ApiResponse<BienPanier>),
        (status = 404, description = "Item not found in the caller's panier"),
    ),
    security(("bearer_auth" = [])),
    tag = "Panier"
)]
pub async fn update_item_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePanierItemRequest>,
) -> AppResult<Json<ApiResponse<BienPanier>>> {
    let resp = panier_service::update_item_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/panier/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Panier item ID")
    ),
    responses(
        (status = 200, description = "Removed from panier", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Item not found in the caller's panier"),
    ),
    security(("bearer_auth" = [])),
    tag = "Panier"
)]
pub async fn remove_from_panier(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = panier_service::remove_from_panier(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/paniers",
    params(Pagination),
    responses(
        (status = 200, description = "All paniers", body = ApiResponse<PanierList>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Panier"
)]
pub async fn list_paniers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PanierList>>> {
    let resp = panier_service::list_paniers(&state, &user, pagination).await?;
    Ok(Json(resp))
}
