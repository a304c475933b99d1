use std::path::PathBuf;

use clap::Parser;
use logsweep::{config::PurgeConfig, db::DbPool, observability, purge};

/// Scheduled retention purge for application log stores.
///
/// Invoked by the host scheduler once per purge. The outcome is reported
/// through log output only; the process always exits 0 so a failed purge
/// never breaks the scheduler's run.
#[derive(Parser)]
#[command(name = "logsweep", version, about, long_about = None)]
struct Cli {
    /// Log category to purge: API, Scheduler, Audit, or All
    #[arg(short = 'c', long)]
    category: String,

    /// Retention duration in days; rows older than now minus this many days
    /// are removed
    #[arg(short = 'd', long)]
    duration: String,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "logsweep.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match PurgeConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet; report on stderr and complete anyway
            eprintln!("logsweep: failed to load {}: {}", cli.config.display(), e);
            return;
        }
    };

    observability::init_tracing(&config.logging);

    tracing::info!(
        category = %cli.category,
        duration = %cli.duration,
        config = %cli.config.display(),
        "Starting purge"
    );

    let db = if config.database.is_none() {
        None
    } else {
        match DbPool::from_config(&config.database).await {
            Ok(pool) => {
                if let Err(e) = pool.health_check().await {
                    tracing::warn!(error = %e, "Log store health check failed");
                }
                Some(pool)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to the log store");
                None
            }
        }
    };

    purge::execute(
        db.as_ref(),
        &config.purge,
        &config.server_logs,
        &cli.category,
        &cli.duration,
    )
    .await;
}
