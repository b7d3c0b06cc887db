//! Service configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is loaded first, if present.
//!
//! # Environment Variables
//!
//! ## Required (postgres backend)
//! - `DB_USER` - database user
//! - `DB_PASSWORD` - database password
//! - `DB_HOST` - database host
//! - `DB_PORT` - database port
//!
//! ## Optional
//! - `DB_NAME` - database name (default: shopping_list)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 10)
//! - `SHOPPING_LIST_STORE` - `postgres` or `memory` (default: postgres)
//! - `HTTP_HOST` - bind address (default: 0.0.0.0)
//! - `HTTP_PORT` - listen port (default: 8080)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreBackend,
}

/// Which Tenant Item Store implementation to run with.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    InMemory,
    Postgres(DatabaseConfig),
}

/// Postgres connection parameters.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.database)
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed::<IpAddr>("HTTP_HOST", "0.0.0.0")?;
        let port = env.parsed::<u16>("HTTP_PORT", "8080")?;

        let store = match env.or_default("SHOPPING_LIST_STORE", "postgres").as_str() {
            "memory" => StoreBackend::InMemory,
            "postgres" => StoreBackend::Postgres(DatabaseConfig {
                user: env.required("DB_USER")?,
                password: SecretString::from(env.required("DB_PASSWORD")?),
                host: env.required("DB_HOST")?,
                port: env.required("DB_PORT")?.parse::<u16>().map_err(|e| {
                    ConfigError::InvalidEnvVar("DB_PORT".to_string(), e.to_string())
                })?,
                database: env.or_default("DB_NAME", "shopping_list"),
                max_connections: env.parsed::<u32>("DB_MAX_CONNECTIONS", "10")?,
            }),
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "SHOPPING_LIST_STORE".to_string(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };

        Ok(Self { host, port, store })
    }

    /// Returns the socket address for binding the server.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
