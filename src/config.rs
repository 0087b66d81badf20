//! Application configuration.
//!
//! Values come from `config.toml` first, then the environment (a `.env` file
//! is loaded if present), then built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::{SessionConfig, SessionOverrides};

const CONFIG_FILE: &str = "config.toml";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    session: Option<SessionOverrides>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

fn read_config_file(path: &Path) -> Option<AppConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

// ==================== Database Configuration ====================

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    let _ = dotenvy::dotenv();
    resolve_database_path(
        read_config_file(Path::new(CONFIG_FILE)),
        std::env::var("DATABASE_PATH").ok(),
    )
}

fn resolve_database_path(config: Option<AppConfig>, env_path: Option<String>) -> PathBuf {
    if let Some(path) = config.and_then(|c| c.database).and_then(|d| d.path) {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    if let Some(path) = env_path {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(crate::paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port when nothing else is configured
pub const SERVER_PORT: u16 = 3000;

/// Port with priority: config.toml > PORT env > default
pub fn server_port() -> u16 {
    let _ = dotenvy::dotenv();
    resolve_port(
        read_config_file(Path::new(CONFIG_FILE)),
        std::env::var("PORT").ok(),
    )
}

fn resolve_port(config: Option<AppConfig>, env_port: Option<String>) -> u16 {
    config
        .and_then(|c| c.server)
        .and_then(|s| s.port)
        .or_else(|| env_port.and_then(|p| p.parse().ok()))
        .unwrap_or(SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Session Configuration ====================

/// Session defaults from the `[session]` table, clamped into range
pub fn load_session_defaults() -> SessionConfig {
    resolve_session_defaults(read_config_file(Path::new(CONFIG_FILE)))
}

fn resolve_session_defaults(config: Option<AppConfig>) -> SessionConfig {
    let overrides = config.and_then(|c| c.session).unwrap_or_default();
    SessionConfig::default().with_overrides(overrides)
}
