//! Retention purge for application log stores.
//!
//! Given a log category and a retention duration in days, `logsweep` deletes
//! rows older than the cutoff from the matching log store using repeated
//! small-batch deletes. For the catch-all `All` category it instead removes
//! accumulated server log files from disk. The host scheduler owns the
//! triggering cadence; one process invocation performs one purge.
//!
//! Outcomes are reported exclusively through structured log events. No error
//! propagates to the host as a non-zero exit: a purge that fails midway logs
//! the failure and keeps whatever progress earlier batches committed.

pub mod config;
pub mod db;
pub mod observability;
pub mod purge;
