//! Server log directory discovery settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where to look for the application server's log directory.
///
/// The sweeper scans `root` for an entry whose name starts with
/// `install_prefix`, then deletes the regular files directly inside that
/// entry's `log_subdir`. The root is an explicit configuration value rather
/// than a process-wide shared directory lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerLogsConfig {
    /// Directory containing the server install (e.g. the Joget base dir).
    /// Required for the `All` category; other categories never touch disk.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Install directory name prefix to match under `root`.
    /// Default: "apache-tomcat-"
    #[serde(default = "default_install_prefix")]
    pub install_prefix: String,

    /// Name of the log directory inside the matched install directory.
    /// Default: "logs"
    #[serde(default = "default_log_subdir")]
    pub log_subdir: String,
}

impl Default for ServerLogsConfig {
    fn default() -> Self {
        Self {
            root: None,
            install_prefix: default_install_prefix(),
            log_subdir: default_log_subdir(),
        }
    }
}

fn default_install_prefix() -> String {
    "apache-tomcat-".to_string()
}

fn default_log_subdir() -> String {
    "logs".to_string()
}
