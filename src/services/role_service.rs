use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    entity::roles::{ActiveModel, Column, Entity as Roles, Model as RoleModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Role,
    response::{ApiResponse, Meta, empty_data},
    state::AppState,
};

pub fn role_from_entity(model: RoleModel) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

async fn ensure_name_free(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut finder = Roles::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(state.db()).await?.is_some() {
        return Err(AppError::Conflict(format!("role '{name}' already exists")));
    }
    Ok(())
}

pub async fn list_roles(state: &AppState) -> AppResult<ApiResponse<RoleList>> {
    let items = Roles::find()
        .order_by_asc(Column::Name)
        .all(state.db())
        .await?
        .into_iter()
        .map(role_from_entity)
        .collect();
    Ok(ApiResponse::success("Roles", RoleList { items }, None))
}

pub async fn get_role(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Role>> {
    let role = Roles::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Role", role_from_entity(role), None))
}

pub async fn create_role(
    state: &AppState,
    auth: &AuthUser,
    payload: CreateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    ensure_admin(auth)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    ensure_name_free(state, &name, None).await?;

    let role = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        created_at: NotSet,
    }
    .insert(state.db())
    .await?;

    audit::record(
        state.db(),
        Some(auth.user_id),
        "role_create",
        "roles",
        serde_json::json!({ "role_id": role.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Role created",
        role_from_entity(role),
        Some(Meta::empty()),
    ))
}

pub async fn update_role(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    ensure_admin(auth)?;
    let existing = Roles::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        ensure_name_free(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    let role = active.update(state.db()).await?;

    Ok(ApiResponse::success(
        "Updated",
        role_from_entity(role),
        Some(Meta::empty()),
    ))
}

pub async fn delete_role(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(auth)?;
    let result = Roles::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.db(),
        Some(auth.user_id),
        "role_delete",
        "roles",
        serde_json::json!({ "role_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", empty_data(), Some(Meta::empty())))
}
