use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "stackshift")]
#[command(version, about = "Migrate Portainer stacks from an old swarm cluster to a new one", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./stackshift.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `stackshift_core=debug` (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Stop, migrate and restart every stack not on the target cluster
    Migrate {
        /// Target cluster id (overrides the config file)
        #[arg(long)]
        cluster_id: Option<String>,

        /// Seconds to wait for stopped stacks to settle
        #[arg(long)]
        poll_budget_secs: Option<u64>,

        /// Milliseconds to wait between migrating and starting a stack
        #[arg(long)]
        settle_delay_ms: Option<u64>,
    },
    /// List stacks not on the target cluster without changing anything
    Orphans {
        /// Target cluster id (overrides the config file)
        #[arg(long)]
        cluster_id: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format);

    let result = match cli.command {
        Commands::Migrate {
            cluster_id,
            poll_budget_secs,
            settle_delay_ms,
        } => {
            commands::migrate::run(commands::migrate::MigrateArgs {
                config: cli.config,
                cluster_id,
                poll_budget_secs,
                settle_delay_ms,
            })
            .await
        }
        Commands::Orphans { cluster_id } => commands::orphans::run(cli.config, cluster_id).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(commands::migrate::EXIT_FAILURE)
        }
    }
}
