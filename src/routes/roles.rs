use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Role,
    response::ApiResponse,
    services::role_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/{id}",
            get(get_role).patch(update_role).delete(delete_role),
        )
}

#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "List roles", body = ApiResponse<RoleList>)
    ),
    tag = "Roles"
)]
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<ApiResponse<RoleList>>> {
    let resp = role_service::list_roles(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Get role", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
    ),
    tag = "Roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = role_service::get_role(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = ApiResponse<Role>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Role name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = role_service::create_role(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated role", body = ApiResponse<Role>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = role_service::update_role(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Deleted role", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Role not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = role_service::delete_role(&state, &user, id).await?;
    Ok(Json(resp))
}
