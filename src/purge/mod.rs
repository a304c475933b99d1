//! Retention purge core.
//!
//! One invocation validates the host-supplied category and duration, resolves
//! the category to a purge target, then either:
//! 1. Deletes rows older than the cutoff from the matching log store, in
//!    bounded batches that each commit independently
//! 2. Sweeps the regular files out of the application server's log directory
//!
//! All outcomes, including every failure, are reported through tracing
//! events; the [`execute`] boundary never returns an error to the host.

mod category;
mod error;
mod job;
mod sweeper;

pub use category::{PurgeAction, PurgeTarget, resolve};
pub use error::PurgeError;
pub use job::{PurgeRunResult, execute, run};
pub use sweeper::{SweepError, SweepOutcome, sweep};
