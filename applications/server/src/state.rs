/// Shared application state
use crate::config::{DiscoverySettings, ListeningSettings};
use crate::services::AuthService;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempo_core::catalog::LegacyCatalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub catalog: Arc<LegacyCatalog>,
    pub discovery: DiscoverySettings,
    pub listening: ListeningSettings,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        Self {
            pool,
            auth_service,
            catalog: Arc::new(LegacyCatalog::builtin()),
            discovery: DiscoverySettings::default(),
            listening: ListeningSettings::default(),
        }
    }

    /// Override discovery and listening limits
    pub fn with_limits(mut self, discovery: DiscoverySettings, listening: ListeningSettings) -> Self {
        self.discovery = discovery;
        self.listening = listening;
        self
    }
}
