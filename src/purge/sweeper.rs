//! Server log directory sweeper.
//!
//! Reclaims disk space from a long-running application server's accumulated
//! log files when a full purge is requested. The sweeper discovers the
//! install directory under a configured root by name prefix, then deletes
//! every regular file directly inside its log subdirectory. It never recurses
//! into nested directories, never creates or writes files, and treats a
//! missing layout as a normal "nothing to sweep" outcome.

use std::{io, path::PathBuf, time::SystemTime};

use thiserror::Error;

use crate::config::ServerLogsConfig;

/// Errors from the discovery phase of a sweep.
///
/// Individual file deletions that fail are counted in [`SweepOutcome`],
/// not raised here; only a listing failure aborts the sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("server_logs.root is not configured")]
    NotConfigured,

    #[error("Failed to list {path}: {source}")]
    List { path: PathBuf, source: io::Error },
}

/// Per-file results from a single sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Regular files removed.
    pub files_deleted: u64,
    /// Regular files whose removal failed; the sweep continued past them.
    pub files_failed: u64,
}

struct InstallDir {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

/// Sweep the discovered server log directory.
///
/// With `dry_run`, files are reported and counted but left in place.
pub async fn sweep(config: &ServerLogsConfig, dry_run: bool) -> Result<SweepOutcome, SweepError> {
    let root = config.root.as_deref().ok_or(SweepError::NotConfigured)?;

    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                root = %root.display(),
                "Server logs root does not exist, nothing to sweep"
            );
            return Ok(SweepOutcome::default());
        }
        Err(source) => {
            return Err(SweepError::List {
                path: root.to_path_buf(),
                source,
            });
        }
    };

    let mut candidates = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(SweepError::List {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&config.install_prefix) {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => {}
            _ => continue,
        }
        let modified = match entry.metadata().await {
            Ok(metadata) => metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            Err(_) => SystemTime::UNIX_EPOCH,
        };
        candidates.push(InstallDir {
            path: entry.path(),
            name,
            modified,
        });
    }

    if candidates.len() > 1 {
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        tracing::warn!(
            candidates = ?names,
            "Multiple server install directories match, sweeping the most recently modified"
        );
    }

    let Some(install) = pick_install_dir(candidates) else {
        tracing::warn!(
            root = %root.display(),
            prefix = %config.install_prefix,
            "No server install directory found, nothing to sweep"
        );
        return Ok(SweepOutcome::default());
    };

    let log_dir = install.path.join(&config.log_subdir);
    let mut entries = match tokio::fs::read_dir(&log_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                log_dir = %log_dir.display(),
                "Server log directory not found, nothing to sweep"
            );
            return Ok(SweepOutcome::default());
        }
        Err(source) => {
            return Err(SweepError::List {
                path: log_dir,
                source,
            });
        }
    };

    let mut outcome = SweepOutcome::default();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(SweepError::List {
                    path: log_dir,
                    source,
                });
            }
        };

        // Non-recursive: subdirectories (and symlinks) are left untouched
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => {}
            _ => continue,
        }

        let path = entry.path();
        if dry_run {
            tracing::info!(file = %path.display(), "DRY RUN: Would delete log file");
            outcome.files_deleted += 1;
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(file = %path.display(), "Deleted log file");
                outcome.files_deleted += 1;
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Failed to delete log file");
                outcome.files_failed += 1;
            }
        }
    }

    Ok(outcome)
}

/// Deterministic choice among matching install directories: newest
/// modification time wins, lexicographically larger name breaks ties.
fn pick_install_dir(candidates: Vec<InstallDir>) -> Option<InstallDir> {
    candidates.into_iter().max_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.name.cmp(&b.name))
    })
}
