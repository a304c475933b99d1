use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{db::error::DbResult, purge::PurgeTarget};

/// Store operations against a purgeable log table.
///
/// The target's table and column names come from the fixed category mapping;
/// implementations splice those identifiers into SQL text and bind every
/// runtime value (cutoff, limit) as a parameter.
#[async_trait]
pub trait LogStoreRepo: Send + Sync {
    /// Count rows older than the cutoff.
    ///
    /// Advisory only: the result is logged for observability and never gates
    /// deletion, which re-evaluates eligibility per batch.
    async fn count_before(&self, target: &PurgeTarget, cutoff: DateTime<Utc>) -> DbResult<i64>;

    /// Delete rows older than the cutoff.
    ///
    /// Deletes in batches of at most `batch_size` rows per statement, each
    /// committing independently, and stops once a batch comes up short or
    /// `max_deletes` is reached. Returns the total number of rows deleted.
    /// A statement failure abandons the remaining batches; rows deleted by
    /// earlier batches stay deleted.
    async fn delete_before(
        &self,
        target: &PurgeTarget,
        cutoff: DateTime<Utc>,
        batch_size: u32,
        max_deletes: u64,
    ) -> DbResult<u64>;
}
