//! Purge entry routine.
//!
//! Validates the host-supplied parameters, resolves the category and
//! dispatches to the batched row purge or the filesystem sweep. The
//! [`execute`] wrapper converts every outcome into log events so the host's
//! scheduler never sees a fault.

use chrono::{Duration, Utc};

use super::{
    PurgeAction, PurgeError, resolve,
    sweeper::{SweepOutcome, sweep},
};
use crate::{
    config::{PurgeOptions, ServerLogsConfig},
    db::{DbError, DbPool, LogStoreRepo},
};

/// Results from a single purge invocation.
#[derive(Debug, Default)]
pub struct PurgeRunResult {
    /// Rows deleted from the resolved log store.
    pub rows_deleted: u64,
    /// Server log files deleted by the sweep.
    pub files_deleted: u64,
    /// Server log files whose deletion failed; the sweep continued.
    pub files_failed: u64,
}

impl PurgeRunResult {
    /// Total number of rows and files deleted.
    pub fn total(&self) -> u64 {
        self.rows_deleted + self.files_deleted
    }

    /// Check if anything was deleted.
    pub fn has_deletions(&self) -> bool {
        self.total() > 0
    }
}

impl From<SweepOutcome> for PurgeRunResult {
    fn from(outcome: SweepOutcome) -> Self {
        PurgeRunResult {
            rows_deleted: 0,
            files_deleted: outcome.files_deleted,
            files_failed: outcome.files_failed,
        }
    }
}

/// Run one purge invocation and report the outcome through log events.
///
/// This is the host-facing boundary: every error kind is caught here and
/// converted to a log entry, so the invocation always completes from the
/// scheduler's point of view.
pub async fn execute(
    db: Option<&DbPool>,
    options: &PurgeOptions,
    server_logs: &ServerLogsConfig,
    category: &str,
    duration: &str,
) {
    match run(db, options, server_logs, category, duration).await {
        Ok(result) => {
            if result.has_deletions() || result.files_failed > 0 {
                tracing::info!(
                    rows_deleted = result.rows_deleted,
                    files_deleted = result.files_deleted,
                    files_failed = result.files_failed,
                    dry_run = options.dry_run,
                    "Purge complete"
                );
            } else {
                tracing::info!(dry_run = options.dry_run, "Purge complete, nothing to delete");
            }
        }
        Err(PurgeError::UnrecognizedCategory(label)) => {
            tracing::warn!(category = %label, "Unrecognized purge category, no action taken");
        }
        Err(e @ PurgeError::InvalidInput(_)) => {
            tracing::error!(error = %e, "Rejected purge invocation, no action taken");
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Purge failed; rows deleted by earlier batches stay deleted"
            );
        }
    }
}

/// Run one purge invocation.
///
/// Inputs are validated before anything else happens: an empty category or
/// an unparseable duration ends the invocation with no statement built and
/// no file touched.
pub async fn run(
    db: Option<&DbPool>,
    options: &PurgeOptions,
    server_logs: &ServerLogsConfig,
    category: &str,
    duration: &str,
) -> Result<PurgeRunResult, PurgeError> {
    if category.trim().is_empty() {
        return Err(PurgeError::InvalidInput(
            "category must not be empty".to_string(),
        ));
    }
    let retention_days = parse_retention_days(duration)?;

    match resolve(category) {
        PurgeAction::Unrecognized => Err(PurgeError::UnrecognizedCategory(category.to_string())),
        PurgeAction::SweepServerLogs => {
            tracing::info!(category, "Sweeping server log directory");
            let outcome = sweep(server_logs, options.dry_run).await?;
            Ok(outcome.into())
        }
        PurgeAction::Store(target) => {
            let db = db.ok_or(DbError::NotConfigured)?;
            let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
            tracing::info!(
                category,
                table = target.table,
                retention_days,
                cutoff = %cutoff,
                "Purging log store"
            );

            let repo = db.log_stores();

            // Advisory pre-count; deletion re-evaluates eligibility per batch
            let eligible = repo.count_before(&target, cutoff).await?;
            tracing::info!(table = target.table, eligible, "Rows eligible for deletion");

            if options.dry_run {
                tracing::info!(
                    table = target.table,
                    eligible,
                    "DRY RUN: Would delete rows older than the cutoff"
                );
                return Ok(PurgeRunResult::default());
            }

            let max_deletes = if options.max_deletes_per_run == 0 {
                u64::MAX
            } else {
                options.max_deletes_per_run
            };

            let rows_deleted = repo
                .delete_before(&target, cutoff, options.batch_size, max_deletes)
                .await?;

            Ok(PurgeRunResult {
                rows_deleted,
                ..Default::default()
            })
        }
    }
}

/// Parse the host-supplied retention duration.
///
/// Negative values are rejected rather than clamped to zero.
fn parse_retention_days(raw: &str) -> Result<u32, PurgeError> {
    let days: i64 = raw.trim().parse().map_err(|_| {
        PurgeError::InvalidInput(format!(
            "retention duration must be a whole number of days, got {raw:?}"
        ))
    })?;
    if days < 0 {
        return Err(PurgeError::InvalidInput(format!(
            "retention duration must not be negative, got {days}"
        )));
    }
    u32::try_from(days).map_err(|_| {
        PurgeError::InvalidInput(format!("retention duration {days} is out of range"))
    })
}


#[cfg(all(test, feature = "database-sqlite"))]
mod store_tests {
    use chrono::{DateTime, Duration, Utc};
    use sqlx::{Row, SqlitePool};
    use tempfile::TempDir;

    use super::*;
    use crate::config::ServerLogsConfig;

    async fn create_test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::query(
            r#"
            CREATE TABLE api_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create api_log table");

        pool
    }

    async fn insert_api_row(pool: &SqlitePool, ts: DateTime<Utc>) {
        sqlx::query("INSERT INTO api_log (timestamp) VALUES (?)")
            .bind(ts)
            .execute(pool)
            .await
            .expect("Failed to insert api_log row");
    }

    async fn count_api_rows(pool: &SqlitePool) -> i64 {
        sqlx::query("SELECT COUNT(*) AS count FROM api_log")
            .fetch_one(pool)
            .await
            .expect("Failed to count rows")
            .get("count")
    }

    fn no_sweep() -> ServerLogsConfig {
        ServerLogsConfig::default()
    }

    #[tokio::test]
    async fn test_api_purge_scenario() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        for _ in 0..7 {
            insert_api_row(&pool, Utc::now() - Duration::days(40)).await;
        }
        for _ in 0..3 {
            insert_api_row(&pool, Utc::now() - Duration::days(5)).await;
        }

        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &no_sweep(),
            "API",
            "30",
        )
        .await
        .expect("purge should succeed");

        assert_eq!(result.rows_deleted, 7);
        assert_eq!(result.files_deleted, 0);
        assert_eq!(count_api_rows(&pool).await, 3);
    }

    #[tokio::test]
    async fn test_purge_is_idempotent() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        for _ in 0..4 {
            insert_api_row(&pool, Utc::now() - Duration::days(40)).await;
        }

        let options = PurgeOptions::default();
        let first = run(Some(&db), &options, &no_sweep(), "API", "30")
            .await
            .expect("first run should succeed");
        let second = run(Some(&db), &options, &no_sweep(), "API", "30")
            .await
            .expect("second run should succeed");

        assert_eq!(first.rows_deleted, 4);
        assert_eq!(second.rows_deleted, 0);
    }

    #[tokio::test]
    async fn test_zero_duration_deletes_everything_before_now() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        insert_api_row(&pool, Utc::now() - Duration::seconds(10)).await;
        insert_api_row(&pool, Utc::now() - Duration::days(100)).await;
        insert_api_row(&pool, Utc::now() + Duration::days(1)).await;

        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &no_sweep(),
            "API",
            "0",
        )
        .await
        .expect("purge should succeed");

        assert_eq!(result.rows_deleted, 2);
        assert_eq!(count_api_rows(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_negative_duration_rejected_before_any_statement() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        insert_api_row(&pool, Utc::now() - Duration::days(40)).await;

        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &no_sweep(),
            "API",
            "-5",
        )
        .await;

        assert!(matches!(result, Err(PurgeError::InvalidInput(_))));
        assert_eq!(count_api_rows(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_empty_category_rejected() {
        let result = run(None, &PurgeOptions::default(), &no_sweep(), "  ", "10").await;
        assert!(matches!(result, Err(PurgeError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_bogus_category_scenario() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());
        insert_api_row(&pool, Utc::now() - Duration::days(40)).await;

        let root = TempDir::new().expect("tempdir");
        let logs = root.path().join("apache-tomcat-9.0.85").join("logs");
        std::fs::create_dir_all(&logs).expect("mkdir");
        std::fs::write(logs.join("catalina.out"), "log data").expect("write");

        let server_logs = ServerLogsConfig {
            root: Some(root.path().to_path_buf()),
            ..Default::default()
        };

        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &server_logs,
            "Bogus",
            "10",
        )
        .await;

        assert!(matches!(result, Err(PurgeError::UnrecognizedCategory(_))));
        // Zero rows deleted, zero files touched
        assert_eq!(count_api_rows(&pool).await, 1);
        assert!(logs.join("catalina.out").exists());
    }

    #[tokio::test]
    async fn test_all_category_sweeps_without_store_purge() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());
        insert_api_row(&pool, Utc::now() - Duration::days(40)).await;

        let root = TempDir::new().expect("tempdir");
        let logs = root.path().join("apache-tomcat-9.0.85").join("logs");
        std::fs::create_dir_all(&logs).expect("mkdir");
        std::fs::write(logs.join("catalina.out"), "log data").expect("write");
        std::fs::write(logs.join("access.log"), "log data").expect("write");

        let server_logs = ServerLogsConfig {
            root: Some(root.path().to_path_buf()),
            ..Default::default()
        };

        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &server_logs,
            "All",
            "30",
        )
        .await
        .expect("sweep should succeed");

        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.rows_deleted, 0);
        // The sweep never issues a store statement
        assert_eq!(count_api_rows(&pool).await, 1);
        assert!(!logs.join("catalina.out").exists());
    }

    #[tokio::test]
    async fn test_all_category_works_without_a_store() {
        let root = TempDir::new().expect("tempdir");
        let logs = root.path().join("apache-tomcat-9.0.85").join("logs");
        std::fs::create_dir_all(&logs).expect("mkdir");
        std::fs::write(logs.join("catalina.out"), "log data").expect("write");

        let server_logs = ServerLogsConfig {
            root: Some(root.path().to_path_buf()),
            ..Default::default()
        };

        let result = run(None, &PurgeOptions::default(), &server_logs, "All", "30")
            .await
            .expect("sweep needs no store");

        assert_eq!(result.files_deleted, 1);
    }

    #[tokio::test]
    async fn test_store_category_without_a_store_fails() {
        let result = run(None, &PurgeOptions::default(), &no_sweep(), "API", "30").await;
        assert!(matches!(
            result,
            Err(PurgeError::Store(DbError::NotConfigured))
        ));
    }

    #[tokio::test]
    async fn test_dry_run_deletes_nothing() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        for _ in 0..5 {
            insert_api_row(&pool, Utc::now() - Duration::days(40)).await;
        }

        let options = PurgeOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = run(Some(&db), &options, &no_sweep(), "API", "30")
            .await
            .expect("dry run should succeed");

        assert_eq!(result.rows_deleted, 0);
        assert_eq!(count_api_rows(&pool).await, 5);
    }

    #[tokio::test]
    async fn test_max_deletes_caps_a_run() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        for _ in 0..30 {
            insert_api_row(&pool, Utc::now() - Duration::days(40)).await;
        }

        let options = PurgeOptions {
            batch_size: 10,
            max_deletes_per_run: 25,
            ..Default::default()
        };
        let result = run(Some(&db), &options, &no_sweep(), "API", "30")
            .await
            .expect("capped run should succeed");

        assert_eq!(result.rows_deleted, 25);
        assert_eq!(count_api_rows(&pool).await, 5);
    }

    #[tokio::test]
    async fn test_missing_table_aborts_with_store_error() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        // wf_audit_trail was never created in this store
        let result = run(
            Some(&db),
            &PurgeOptions::default(),
            &no_sweep(),
            "Audit",
            "30",
        )
        .await;

        assert!(matches!(result, Err(PurgeError::Store(_))));
    }

    #[tokio::test]
    async fn test_execute_never_fails() {
        let pool = create_test_pool().await;
        let db = DbPool::from_sqlite(pool.clone());

        // Each of these would be an error from run(); execute() absorbs them
        execute(Some(&db), &PurgeOptions::default(), &no_sweep(), "Bogus", "10").await;
        execute(Some(&db), &PurgeOptions::default(), &no_sweep(), "API", "nope").await;
        execute(None, &PurgeOptions::default(), &no_sweep(), "API", "30").await;
        execute(Some(&db), &PurgeOptions::default(), &no_sweep(), "Audit", "30").await;
    }
}
