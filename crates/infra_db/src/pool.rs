//! Database connection pool management
//!
//! Connection pool configuration and creation for PostgreSQL using SQLx.
//! Settings come either from the builder or from `LEDGER_*` environment
//! variables (see [`LedgerSettings`]).

use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Configuration options for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a configuration with sensible defaults for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the maximum number of connections in the pool
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections to maintain
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout duration
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Environment-driven settings for the ledger database
///
/// Read from `LEDGER_DATABASE_URL`, `LEDGER_MAX_CONNECTIONS`, and
/// `LEDGER_LOG_LEVEL`.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Maximum pool size
    pub max_connections: u32,
    /// Log filter for the management binary
    pub log_level: String,
}

impl LedgerSettings {
    /// Loads settings from `LEDGER_*` environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        config::Config::builder()
            .set_default("max_connections", 10_i64)
            .and_then(|b| b.set_default("log_level", "info"))
            .map_err(|e| DatabaseError::Configuration(e.to_string()))?
            .add_source(config::Environment::with_prefix("LEDGER"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DatabaseError::Configuration(e.to_string()))
    }

    /// Converts into a pool configuration
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url).max_connections(self.max_connections)
    }
}

/// Creates a database connection pool with the given configuration
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if the pool cannot be created.
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("database pool created");
    Ok(pool)
}

/// Runs the embedded schema migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
