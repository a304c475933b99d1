//! Row purge sizing and safety settings.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Batch sizing and safety valves for row purges.
///
/// Log tables can hold millions of purgeable rows; deletes are bounded per
/// statement so each unit of work stays small and interruptible, and partial
/// progress survives a mid-run failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurgeOptions {
    /// Maximum rows removed by one delete statement.
    /// Default: 100
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Maximum rows removed in one invocation, across all batches.
    /// Set to 0 for unlimited.
    /// Default: 0
    #[serde(default)]
    pub max_deletes_per_run: u64,

    /// If true, log what would be deleted without deleting anything.
    /// Applies to both row purges and filesystem sweeps.
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_deletes_per_run: 0,
            dry_run: false,
        }
    }
}

fn default_batch_size() -> u32 {
    100
}

impl PurgeOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Validation(
                "purge.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
