#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use immo_api::{
    config::AppConfig,
    middleware::auth::AuthUser,
    models::{Description, Location, Price, Property, PropertyDraft, Room, Surfaces},
    services::{notifier::LogNotifier, property_shaper},
    state::AppState,
    store::InMemoryPropertyStore,
};
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

pub fn location() -> Location {
    Location {
        number: Some("3".into()),
        street: Some("rue des Lilas".into()),
        postal_code: Some("69003".into()),
        city: Some("Lyon".into()),
        ..Location::default()
    }
}

/// A complete draft that passes validation.
pub fn draft(property_type: &str, habitable: f64, rooms: Vec<Room>) -> PropertyDraft {
    PropertyDraft {
        property_type: property_type.into(),
        status: "disponible".into(),
        description: Some(Description {
            title: "Annonce".into(),
            body: "Bien en bon état".into(),
        }),
        location: Some(location()),
        surfaces: Some(Surfaces {
            habitable,
            ..Surfaces::default()
        }),
        price: Some(Price {
            base_price: 250_000.0,
            ..Price::default()
        }),
        rooms,
        ..PropertyDraft::default()
    }
}

pub fn property(property_type: &str, habitable: f64, rooms: Vec<Room>) -> Property {
    property_shaper::prepare(draft(property_type, habitable, rooms))
        .expect("valid draft")
        .into_property(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
}

pub fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        otp_ttl_minutes: 60,
    }
}

/// State whose properties live in memory. The ORM handle is an empty mock,
/// so audit writes fail and are only logged.
pub fn memory_state() -> AppState {
    AppState {
        orm: Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
        config: Arc::new(config()),
        properties: Arc::new(InMemoryPropertyStore::new()),
        notifier: Arc::new(LogNotifier),
    }
}

pub fn auth(role: &str) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: role.into(),
    }
}
