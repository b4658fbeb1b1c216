pub mod auth;
pub mod media;
pub mod panier;
pub mod properties;
pub mod roles;
pub mod users;
