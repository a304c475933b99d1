//! Category-to-target resolution.
//!
//! The category label arrives from the host as a free-form string. Resolution
//! is a closed mapping: a known label yields exactly one purge target, `All`
//! yields the filesystem-sweep marker, and anything else yields
//! [`PurgeAction::Unrecognized`] so the caller can refuse to act. No label
//! ever produces an empty or partial target.

/// A purgeable log store: table name plus the column that determines row age.
///
/// Both identifiers are `'static` and come only from [`resolve`]'s fixed
/// mapping, never from input, so they are safe to splice into SQL text. Every
/// mapped column holds wall-clock-comparable timestamps and is indexed for
/// range scans in the host schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeTarget {
    pub table: &'static str,
    pub column: &'static str,
}

/// What a category label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeAction {
    /// Purge rows from a log store.
    Store(PurgeTarget),
    /// Sweep the application server's log directory; no store is touched.
    SweepServerLogs,
    /// Unknown label; the caller must log and take no destructive action.
    Unrecognized,
}

/// Resolve a category label to its purge action.
///
/// Pure and deterministic; matching is exact (labels are case-sensitive,
/// as in the host's category vocabulary).
pub fn resolve(category: &str) -> PurgeAction {
    match category {
        "API" => PurgeAction::Store(PurgeTarget {
            table: "api_log",
            column: "timestamp",
        }),
        "Scheduler" => PurgeAction::Store(PurgeTarget {
            table: "sch_job_log",
            column: "startTime",
        }),
        "Audit" => PurgeAction::Store(PurgeTarget {
            table: "wf_audit_trail",
            column: "timestamp",
        }),
        "All" => PurgeAction::SweepServerLogs,
        _ => PurgeAction::Unrecognized,
    }
}
