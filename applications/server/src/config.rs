/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub listening: ListeningSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_jwt_refresh_expiration_days")]
    pub jwt_refresh_expiration_days: u64,
}

/// Paging limits for discovery listings
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_discover_limit")]
    pub default_limit: u32,

    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    #[serde(default = "default_popular_tags_limit")]
    pub popular_tags_limit: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ListeningSettings {
    /// Plays kept per user
    #[serde(default = "default_recently_played_cap")]
    pub recently_played_cap: u32,
}

impl DiscoverySettings {
    /// Requested page size, defaulted and clamped to `max_limit`
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (or `path`) and `TEMPO__*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        }

        // e.g. TEMPO__AUTH__JWT_SECRET
        settings = settings.add_source(
            config::Environment::with_prefix("TEMPO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set TEMPO__AUTH__JWT_SECRET)".to_string(),
            ));
        }

        let discovery = &self.discovery;
        if discovery.default_limit == 0 || discovery.max_limit == 0 || discovery.popular_tags_limit == 0 {
            return Err(ServerError::Config(
                "discovery limits must be positive".to_string(),
            ));
        }
        if discovery.default_limit > discovery.max_limit {
            return Err(ServerError::Config(format!(
                "discovery.default_limit ({}) exceeds discovery.max_limit ({})",
                discovery.default_limit, discovery.max_limit
            )));
        }

        if self.listening.recently_played_cap == 0 {
            return Err(ServerError::Config(
                "listening.recently_played_cap must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tempo.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        jwt_refresh_expiration_days: default_jwt_refresh_expiration_days(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_jwt_refresh_expiration_days() -> u64 {
    30
}

fn default_discover_limit() -> u32 {
    tempo_core::types::DEFAULT_DISCOVER_LIMIT
}

fn default_max_limit() -> u32 {
    100
}

fn default_popular_tags_limit() -> u32 {
    tempo_storage::discovery::DEFAULT_POPULAR_TAGS
}

fn default_recently_played_cap() -> u32 {
    tempo_storage::listening::DEFAULT_RECENTLY_PLAYED_CAP
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            default_limit: default_discover_limit(),
            max_limit: default_max_limit(),
            popular_tags_limit: default_popular_tags_limit(),
        }
    }
}

impl Default for ListeningSettings {
    fn default() -> Self {
        Self {
            recently_played_cap: default_recently_played_cap(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            discovery: DiscoverySettings::default(),
            listening: ListeningSettings::default(),
        }
    }
}
