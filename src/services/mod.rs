pub mod auth_service;
pub mod media_service;
pub mod notifier;
pub mod panier_service;
pub mod property_service;
pub mod property_shaper;
pub mod role_service;
pub mod user_service;
