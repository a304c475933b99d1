mod error;
#[cfg(feature = "database-postgres")]
pub mod postgres;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(feature = "database-postgres")]
    Postgres(sqlx::PgPool),
    #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
    _None(std::convert::Infallible),
}

/// Log store pool supporting both SQLite and PostgreSQL.
///
/// The repository is cached at construction time; connections are checked
/// out per statement and returned to the pool on drop, on every exit path.
pub struct DbPool {
    inner: PoolStorage,
    log_stores: Arc<dyn LogStoreRepo>,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        DbPool {
            log_stores: Arc::new(sqlite::SqliteLogStoreRepo::new(pool.clone())),
            inner: PoolStorage::Sqlite(pool),
        }
    }

    /// Create a DbPool from an existing PostgreSQL pool.
    /// Primarily useful for testing.
    #[cfg(feature = "database-postgres")]
    pub fn from_postgres(pool: sqlx::PgPool) -> Self {
        DbPool {
            log_stores: Arc::new(postgres::PostgresLogStoreRepo::new(pool.clone())),
            inner: PoolStorage::Postgres(pool),
        }
    }

    /// Create a pool from configuration.
    ///
    /// The purge tool never creates or migrates the store; the host
    /// application owns the schema, so a missing database file or an
    /// unreachable server is a connection error here.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                Ok(Self::from_sqlite(pool))
            }
            #[cfg(feature = "database-postgres")]
            DatabaseConfig::Postgres(cfg) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect(&cfg.url)
                    .await?;

                Ok(Self::from_postgres(pool))
            }
        }
    }

    /// Get the log store repository.
    pub fn log_stores(&self) -> Arc<dyn LogStoreRepo> {
        Arc::clone(&self.log_stores)
    }

    /// Health check for store connectivity.
    pub async fn health_check(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");

        let db = DbPool::from_sqlite(pool);
        db.health_check().await.expect("health check should pass");
    }

    #[tokio::test]
    async fn test_from_config_rejects_missing_store() {
        let result = DbPool::from_config(&DatabaseConfig::None).await;
        assert!(matches!(result, Err(DbError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_from_config_fails_on_missing_database_file() {
        let config: DatabaseConfig = toml::from_str(
            r#"
            type = "sqlite"
            path = "/nonexistent/logsweep-test/jwdb.sqlite"
        "#,
        )
        .expect("config should parse");

        let result = DbPool::from_config(&config).await;
        assert!(matches!(result, Err(DbError::Sqlx(_))));
    }
}
