mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use immo_api::{
    routes::{create_api_router, health},
    services::auth_service::issue_token,
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

use common::memory_state;

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_public() {
    let response = app(memory_state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn writes_require_a_bearer_token() {
    let response = app(memory_state())
        .oneshot(
            Request::post("/api/properties")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(memory_state())
        .oneshot(Request::get("/api/panier").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_property_lists_every_violation() {
    let state = memory_state();
    let token = issue_token(
        &state.config.jwt_secret,
        1,
        Uuid::new_v4(),
        "agent@example.com",
        "agent",
        vec!["agent".into()],
    )
    .unwrap();

    let body = serde_json::json!({
        "property_type": "maison",
        "status": "disponible",
        "rooms": [{ "type": "chambre", "surface": 0 }]
    });
    let response = app(state)
        .oneshot(
            Request::post("/api/properties")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["message"].as_str().expect("message");
    assert!(message.starts_with("Validation failed: "));
    assert!(message.contains("room 1: surface must be positive"));
    assert!(message.contains("location is required"));
    assert!(message.contains("description is required"));
}

#[tokio::test]
async fn surface_search_over_memory_store() {
    let response = app(memory_state())
        .oneshot(
            Request::get("/api/properties/search/surface?min_surface=10&max_surface=20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}
