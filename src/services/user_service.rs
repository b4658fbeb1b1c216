use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        properties::PropertyList,
        roles::RoleList,
        users::{AssignRoleRequest, CountResponse, UpdateUserRequest, UserList, UserListQuery},
    },
    entity::{
        Roles, UserRoles,
        user_roles::{ActiveModel as UserRoleActive, Column as UserRoleCol},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::User,
    response::{ApiResponse, Meta, empty_data},
    services::{
        auth_service::{KNOWN_ROLES, hash_password, normalize_phone, validate_password},
        role_service::role_from_entity,
    },
    state::AppState,
    store::PropertyFilter,
};

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        last_name: model.last_name,
        first_name: model.first_name,
        email: model.email,
        phone_number: model.phone_number,
        role: model.role,
        verified: model.verified,
        registered_at: model.registered_at.with_timezone(&Utc),
    }
}

fn list_condition(query: &UserListQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(verified) = query.verified {
        condition = condition.add(UserCol::Verified.eq(verified));
    }
    condition
}

pub async fn list_users(
    state: &AppState,
    auth: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(auth)?;
    let (page, limit, offset) = query.pagination().normalize();
    let finder = Users::find()
        .filter(list_condition(&query))
        .order_by_desc(UserCol::RegisteredAt);

    let total = finder.clone().count(state.db()).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(state.db())
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn count_users(
    state: &AppState,
    auth: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<CountResponse>> {
    ensure_admin(auth)?;
    let count = Users::find()
        .filter(list_condition(&query))
        .count(state.db())
        .await?;
    Ok(ApiResponse::success("Users count", CountResponse { count }, None))
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_user(state: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    ensure_owner_or_admin(auth, id)?;
    let user = find_user(state, id).await?;
    Ok(ApiResponse::success("User", user_from_entity(user), None))
}

pub async fn update_user(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_owner_or_admin(auth, id)?;
    if (payload.role.is_some() || payload.verified.is_some()) && !auth.is_admin() {
        return Err(AppError::Forbidden);
    }
    if let Some(role) = payload.role.as_deref() {
        if !KNOWN_ROLES.contains(&role) {
            return Err(AppError::BadRequest(format!("unknown role '{role}'")));
        }
    }
    let existing = find_user(state, id).await?;

    let mut active: UserActive = existing.into();
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(phone) = payload.phone_number {
        let phone = normalize_phone(&phone)?;
        let taken = Users::find()
            .filter(UserCol::PhoneNumber.eq(phone.as_str()))
            .filter(UserCol::Id.ne(id))
            .one(state.db())
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Phone number already exists".into()));
        }
        active.phone_number = Set(phone);
    }
    if let Some(password) = payload.password {
        validate_password(&password)?;
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(verified) = payload.verified {
        active.verified = Set(verified);
    }

    let user = active.update(state.db()).await?;

    audit::record(
        state.db(),
        Some(auth.user_id),
        "user_update",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(auth)?;
    let result = Users::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.db(),
        Some(auth.user_id),
        "user_delete",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", empty_data(), Some(Meta::empty())))
}

pub async fn list_user_properties(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<PropertyList>> {
    let items = state
        .properties
        .find_all(&PropertyFilter::owned_by(id))
        .await?;
    Ok(ApiResponse::success("Properties", PropertyList { items }, None))
}

pub async fn list_user_roles(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<RoleList>> {
    ensure_owner_or_admin(auth, id)?;
    let user = find_user(state, id).await?;
    let items = user
        .find_related(Roles)
        .all(state.db())
        .await?
        .into_iter()
        .map(role_from_entity)
        .collect();
    Ok(ApiResponse::success("Roles", RoleList { items }, None))
}

pub async fn assign_role(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: AssignRoleRequest,
) -> AppResult<ApiResponse<RoleList>> {
    ensure_admin(auth)?;
    find_user(state, id).await?;
    Roles::find_by_id(payload.role_id)
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::BadRequest("role not found".into()))?;

    let already = UserRoles::find()
        .filter(UserRoleCol::UserId.eq(id))
        .filter(UserRoleCol::RoleId.eq(payload.role_id))
        .one(state.db())
        .await?;
    if already.is_none() {
        UserRoleActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(id),
            role_id: Set(payload.role_id),
        }
        .insert(state.db())
        .await?;

        audit::record(
            state.db(),
            Some(auth.user_id),
            "role_assign",
            "user_roles",
            serde_json::json!({ "user_id": id, "role_id": payload.role_id }),
        )
        .await;
    }

    list_user_roles(state, auth, id).await
}

pub async fn revoke_role(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    role_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(auth)?;
    let result = UserRoles::delete_many()
        .filter(UserRoleCol::UserId.eq(id))
        .filter(UserRoleCol::RoleId.eq(role_id))
        .exec(state.db())
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state.db(),
        Some(auth.user_id),
        "role_revoke",
        "user_roles",
        serde_json::json!({ "user_id": id, "role_id": role_id }),
    )
    .await;

    Ok(ApiResponse::success("Role revoked", empty_data(), Some(Meta::empty())))
}
