use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::panier::{
        AddToPanierRequest, AddToPanierResponse, DEFAULT_REQUEST_STATUS, PanierItemDto,
        PanierList, PanierView, UpdatePanierItemRequest,
    },
    entity::{
        bien_paniers::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as BienPaniers,
            Model as ItemModel,
        },
        paniers::{ActiveModel as PanierActive, Column as PanierCol, Entity as Paniers, Model as PanierModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{BienPanier, Panier},
    response::{ApiResponse, Meta, empty_data},
    routes::params::Pagination,
    state::AppState,
};

pub fn panier_from_entity(model: PanierModel) -> Panier {
    Panier {
        id: model.id,
        user_id: model.user_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn item_from_entity(model: ItemModel) -> BienPanier {
    BienPanier {
        id: model.id,
        panier_id: model.panier_id,
        property_id: model.property_id,
        request_status: model.request_status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

async fn find_panier(state: &AppState, user_id: Uuid) -> AppResult<Option<PanierModel>> {
    Ok(Paniers::find()
        .filter(PanierCol::UserId.eq(user_id))
        .one(state.db())
        .await?)
}

async fn find_or_create_panier(state: &AppState, user_id: Uuid) -> AppResult<PanierModel> {
    if let Some(panier) = find_panier(state, user_id).await? {
        return Ok(panier);
    }
    let inserted = PanierActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        created_at: NotSet,
    }
    .insert(state.db())
    .await;
    match inserted {
        Ok(panier) => {
            tracing::debug!(panier_id = %panier.id, %user_id, "panier created");
            Ok(panier)
        }
        // a concurrent request created it first
        Err(err) => match AppError::conflict_on_unique(err, "panier exists") {
            AppError::Conflict(_) => find_panier(state, user_id)
                .await?
                .ok_or(AppError::NotFound),
            other => Err(other),
        },
    }
}

/// Loads an item of the caller's panier, or fails with NotFound.
async fn find_own_item(state: &AppState, user: &AuthUser, item_id: Uuid) -> AppResult<ItemModel> {
    let panier = find_panier(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    BienPaniers::find_by_id(item_id)
        .filter(ItemCol::PanierId.eq(panier.id))
        .one(state.db())
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_panier(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PanierView>> {
    let Some(panier) = find_panier(state, user.user_id).await? else {
        return Ok(ApiResponse::success(
            "OK",
            PanierView {
                panier: None,
                items: Vec::new(),
            },
            None,
        ));
    };

    let rows = BienPaniers::find()
        .filter(ItemCol::PanierId.eq(panier.id))
        .order_by_desc(ItemCol::CreatedAt)
        .all(state.db())
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        match state.properties.find_by_id(row.property_id).await? {
            Some(property) => items.push(PanierItemDto {
                id: row.id,
                request_status: row.request_status,
                property,
            }),
            None => tracing::warn!(
                item_id = %row.id,
                property_id = %row.property_id,
                "panier item references a missing property"
            ),
        }
    }

    Ok(ApiResponse::success(
        "OK",
        PanierView {
            panier: Some(panier_from_entity(panier)),
            items,
        },
        None,
    ))
}

pub async fn add_to_panier(
    state: &AppState,
    user: &AuthUser,
    payload: AddToPanierRequest,
) -> AppResult<ApiResponse<AddToPanierResponse>> {
    if state
        .properties
        .find_by_id(payload.property_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("property not found".to_string()));
    }

    let panier = find_or_create_panier(state, user.user_id).await?;

    let exist = BienPaniers::find()
        .filter(ItemCol::PanierId.eq(panier.id))
        .filter(ItemCol::PropertyId.eq(payload.property_id))
        .one(state.db())
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict(format!(
            "property {} is already in the panier",
            payload.property_id
        )));
    }

    let request_status = payload
        .request_status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REQUEST_STATUS.to_string());
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        panier_id: Set(panier.id),
        property_id: Set(payload.property_id),
        request_status: Set(request_status),
        created_at: NotSet,
    }
    .insert(state.db())
    .await
    .map_err(|err| {
        AppError::conflict_on_unique(
            err,
            format!("property {} is already in the panier", payload.property_id),
        )
    })?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "panier_add",
        "bien_paniers",
        serde_json::json!({ "panier_id": panier.id, "property_id": payload.property_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Property added to panier",
        AddToPanierResponse {
            panier: panier_from_entity(panier),
            item: item_from_entity(item),
        },
        None,
    ))
}

pub async fn update_item_status(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdatePanierItemRequest,
) -> AppResult<ApiResponse<BienPanier>> {
    if payload.request_status.trim().is_empty() {
        return Err(AppError::BadRequest("request_status is required".into()));
    }
    let item = find_own_item(state, user, item_id).await?;

    let mut active: ItemActive = item.into();
    active.request_status = Set(payload.request_status);
    let item = active.update(state.db()).await?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "panier_status",
        "bien_paniers",
        serde_json::json!({ "item_id": item.id, "request_status": item.request_status }),
    )
    .await;

    Ok(ApiResponse::success("Updated", item_from_entity(item), None))
}

pub async fn remove_from_panier(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let item = find_own_item(state, user, item_id).await?;
    BienPaniers::delete_by_id(item.id).exec(state.db()).await?;

    audit::record(
        state.db(),
        Some(user.user_id),
        "panier_remove",
        "bien_paniers",
        serde_json::json!({ "item_id": item_id, "property_id": item.property_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from panier",
        empty_data(),
        Some(Meta::empty()),
    ))
}

pub async fn list_paniers(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PanierList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();
    let finder = Paniers::find().order_by_desc(PanierCol::CreatedAt);
    let total = finder.clone().count(state.db()).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(state.db())
        .await?
        .into_iter()
        .map(panier_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Paniers", PanierList { items }, Some(meta)))
}
