use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::{
    db::{error::DbResult, repos::LogStoreRepo},
    purge::PurgeTarget,
};

pub struct PostgresLogStoreRepo {
    pool: PgPool,
}

impl PostgresLogStoreRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStoreRepo for PostgresLogStoreRepo {
    async fn count_before(&self, target: &PurgeTarget, cutoff: DateTime<Utc>) -> DbResult<i64> {
        let sql = format!(
            r#"SELECT COUNT(*) AS count FROM "{table}" WHERE "{column}" < $1"#,
            table = target.table,
            column = target.column,
        );

        let row = sqlx::query(&sql).bind(cutoff).fetch_one(&self.pool).await?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn delete_before(
        &self,
        target: &PurgeTarget,
        cutoff: DateTime<Utc>,
        batch_size: u32,
        max_deletes: u64,
    ) -> DbResult<u64> {
        // ctid addresses rows in any host table without assuming a primary
        // key column name; DELETE has no LIMIT in PostgreSQL so the bound
        // lives in the subquery
        let sql = format!(
            r#"
            DELETE FROM "{table}"
            WHERE ctid IN (
                SELECT ctid FROM "{table}"
                WHERE "{column}" < $1
                LIMIT $2
            )
            "#,
            table = target.table,
            column = target.column,
        );

        let mut total_deleted: u64 = 0;

        loop {
            if total_deleted >= max_deletes {
                break;
            }

            let remaining = max_deletes - total_deleted;
            let limit = std::cmp::min(batch_size as u64, remaining) as i64;

            let result = sqlx::query(&sql)
                .bind(cutoff)
                .bind(limit)
                .execute(&self.pool)
                .await?;

            let rows_deleted = result.rows_affected();
            total_deleted += rows_deleted;

            tracing::debug!(
                table = target.table,
                rows_deleted,
                total_deleted,
                "Deleted batch"
            );

            if rows_deleted < limit as u64 {
                break;
            }
        }

        Ok(total_deleted)
    }
}
