//! # Admin Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. MAESTRO_DB_PATH (highest priority, database path only)             │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     MAESTRO__HTTP__PORT=8080                                            │
//! │     MAESTRO__LOG__JSON=true                                             │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     ./maestro.toml, or the path in MAESTRO_CONFIG                       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! │     127.0.0.1:8000, database in the platform data directory            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # maestro.toml
//! [http]
//! bind = "0.0.0.0"
//! port = 8000
//!
//! [database]
//! path = "/var/lib/maestro/maestro.db"
//! max_connections = 5
//! min_connections = 1
//! run_migrations = true
//!
//! [log]
//! filter = "info,maestro=debug,sqlx=warn"
//! json = false
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use maestro_db::DbConfig;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MAESTRO_CONFIG";

/// Env var overriding the database path directly.
pub const DB_PATH_ENV: &str = "MAESTRO_DB_PATH";

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,maestro=debug,sqlx=warn";

// =============================================================================
// Errors
// =============================================================================

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Could not determine the data directory; set {DB_PATH_ENV}")]
    NoDataDir,
}

// =============================================================================
// Settings
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file. `None` means the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub http: HttpSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

impl AdminConfig {
    /// Loads configuration from defaults, file, and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `MAESTRO_CONFIG`, else `./maestro.toml` if present)
    /// 3. `MAESTRO__SECTION__KEY` environment variables
    /// 4. `MAESTRO_DB_PATH`
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path =
            config_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let mut config = Self::build(config_path, None)?;

        if let Some(path) = std::env::var_os(DB_PATH_ENV) {
            debug!(path = ?path, "Overriding database path from environment");
            config.database.path = Some(PathBuf::from(path));
        }

        config.validate()?;
        info!(
            bind = %config.http.bind,
            port = config.http.port,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layers the sources without validating.
    ///
    /// `env` replaces the process environment when given.
    fn build(
        config_path: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AdminConfig::default())?);

        builder = match config_path {
            Some(path) => {
                info!(?path, "Loading config from file");
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name("maestro").required(false)),
        };

        let environment = Environment::with_prefix("MAESTRO")
            .separator("__")
            .try_parsing(true)
            .source(env);

        let config = builder
            .add_source(environment)
            .build()?
            .try_deserialize::<AdminConfig>()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidValue("http.port".into()));
        }

        if self.database.min_connections == 0 {
            return Err(ConfigError::InvalidValue("database.min_connections".into()));
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::InvalidValue("database.max_connections".into()));
        }

        Ok(())
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http.bind, self.http.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("http.bind".into()))
    }

    /// Log filter directives from the config, or the default.
    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/cl.maestro.admin/maestro.db`
    /// - **Windows**: `%APPDATA%\maestro\admin\data\maestro.db`
    /// - **Linux**: `~/.local/share/admin/maestro.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("cl", "maestro", "admin").ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join("maestro.db"))
    }

    /// Database pool configuration for [`maestro_db::Database::new`].
    pub fn db_config(&self) -> Result<DbConfig, ConfigError> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .min_connections(self.database.min_connections)
            .run_migrations(self.database.run_migrations))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
