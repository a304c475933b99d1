use thiserror::Error;

use super::sweeper::SweepError;
use crate::db::DbError;

/// Everything that can go wrong in one purge invocation.
///
/// All variants are converted to log events at the invocation boundary;
/// none propagate to the host.
#[derive(Debug, Error)]
pub enum PurgeError {
    /// Duration not parseable as a non-negative integer, or empty category.
    /// Detected before any statement is built.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Well-formed but unknown category label. No action is taken.
    #[error("Unrecognized purge category {0:?}")]
    UnrecognizedCategory(String),

    /// Pool missing/unreachable or a statement failed. Batches already
    /// committed stay committed.
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    /// Log directory discovery failed. Aborts only the sweep.
    #[error("Log sweep error: {0}")]
    Sweep(#[from] SweepError),
}
