use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    services::notifier::{LogNotifier, Notifier},
    store::{PropertyStore, SeaOrmPropertyStore},
};

/// Shared handles. The connection sits behind an `Arc` so the state stays
/// `Clone` whatever backend sea-orm was built with.
#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub properties: Arc<dyn PropertyStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// State backed by Postgres for properties and a logging notifier.
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        let orm = Arc::new(orm);
        Self {
            properties: Arc::new(SeaOrmPropertyStore::new(orm.clone())),
            notifier: Arc::new(LogNotifier),
            config: Arc::new(config),
            orm,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.orm
    }
}
