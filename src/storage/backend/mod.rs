//! SeaORM storage backend
//!
//! Persistence for origins, registrations and querystring parameter
//! counters, supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod groups;
mod origins;
mod registrations;
pub mod retry;

use std::time::Duration;

use moka::sync::Cache;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{Result, TrackError};
use crate::storage::models::Origin;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_origin, origin_to_active_model};
pub use registrations::RegistrationOutcome;

/// Infer the database type from the connection URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(TrackError::database_config(format!(
            "cannot infer database type from URL: {}. Supported URL schemes: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// Origin listing filter
#[derive(Default, Clone, Debug)]
pub struct OriginFilter {
    /// Substring match on code or title
    pub search: Option<String>,
    /// Restrict to members of one group
    pub group_id: Option<i64>,
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct TrackingStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// Hit-path resolve cache (None when the TTL is configured as 0)
    resolve_cache: Option<Cache<String, Origin>>,
    /// Retry configuration
    retry_config: retry::RetryConfig,
}

impl TrackingStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(TrackError::database_config(
                "DATABASE_URL is not set".to_string(),
            ));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let resolve_ttl = config.tracking.resolve_cache_ttl;
        let storage = TrackingStorage {
            db,
            backend_name: backend_name.to_string(),
            resolve_cache: (resolve_ttl > 0).then(|| {
                Cache::builder()
                    .time_to_live(Duration::from_secs(resolve_ttl))
                    .max_capacity(10_000)
                    .build()
            }),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Database handle for callers that need raw access (health probe)
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Drop one cached resolve entry (called after admin update/delete)
    pub fn invalidate_resolve_cache(&self, code: &str) {
        if let Some(cache) = &self.resolve_cache {
            cache.invalidate(code);
        }
    }

    /// Close the underlying connection pool
    pub async fn close(&self) -> Result<()> {
        self.db.close_by_ref().await.map_err(|e| {
            TrackError::database_connection(format!("failed to close database pool: {}", e))
        })
    }
}
