use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::{Result, TrackError};
use migration::{Migrator, MigratorTrait};

/// Connect to SQLite (auto-creates the file, tuned for concurrent writers)
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| TrackError::database_config(format!("invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .pragma("cache_size", "-64000")
        .pragma("temp_store", "memory")
        .pragma("mmap_size", "536870912")
        .pragma("wal_autocheckpoint", "1000");

    // Pool through sqlx directly so the pragmas above apply per connection
    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        TrackError::database_connection(format!("failed to connect to SQLite: {}", e))
    })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Connect to MySQL/PostgreSQL
pub async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
    let config = crate::config::get_config();
    let pool_size = config.database.pool_size;

    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(std::time::Duration::from_secs(8))
        .acquire_timeout(std::time::Duration::from_secs(8))
        .idle_timeout(std::time::Duration::from_secs(300))
        .max_lifetime(std::time::Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        TrackError::database_connection(format!(
            "failed to connect to {}: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// Run pending database migrations
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| TrackError::database_operation(format!("migration failed: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
