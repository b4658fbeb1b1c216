use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod doc;
pub mod health;
pub mod media;
pub mod panier;
pub mod params;
pub mod properties;
pub mod roles;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/properties", properties::router())
        .nest("/media", media::router())
        .nest("/panier", panier::router())
        .route("/paniers", get(panier::list_paniers))
}
