mod common;

use axum::{http::StatusCode, response::IntoResponse};
use immo_api::{
    dto::users::UpdateUserRequest, error::AppError, services::user_service,
};
use sea_orm::DbErr;

use common::{auth, memory_state};

#[test]
fn non_constraint_database_errors_stay_server_errors() {
    let err = AppError::conflict_on_unique(DbErr::Custom("connection reset".into()), "dup");
    assert!(matches!(err, AppError::OrmError(_)));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn conflicts_map_to_409() {
    let err = AppError::Conflict("property already in panier".into());
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_cannot_assign_an_unknown_role() {
    let state = memory_state();
    let admin = auth("admin");
    let err = user_service::update_user(
        &state,
        &admin,
        uuid::Uuid::new_v4(),
        UpdateUserRequest {
            last_name: None,
            first_name: None,
            phone_number: None,
            password: None,
            role: Some("superuser".into()),
            verified: None,
        },
    )
    .await
    .expect_err("unknown role");
    assert!(matches!(err, AppError::BadRequest(_)));
}
