use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use stackshift_core::{MigrationDriver, MigrationReport, StackshiftError};

use super::utils::{connect, load_config};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when stacks could not be stopped and migration was not attempted.
pub const EXIT_STRAGGLERS: u8 = 2;

pub struct MigrateArgs {
    pub config: Option<PathBuf>,
    pub cluster_id: Option<String>,
    pub poll_budget_secs: Option<u64>,
    pub settle_delay_ms: Option<u64>,
}

pub async fn run(args: MigrateArgs) -> Result<ExitCode> {
    let config = load_config(args.config, args.cluster_id)?;

    let mut policy = config.policy;
    if let Some(secs) = args.poll_budget_secs {
        policy = policy.with_poll_budget(Duration::from_secs(secs));
    }
    if let Some(ms) = args.settle_delay_ms {
        policy = policy.with_settle_delay(Duration::from_millis(ms));
    }

    let client = connect(&config).await?;
    let driver = MigrationDriver::new(&client, &config.cluster_id, policy);

    let outcome = driver.run().await;
    let status = exit_status(&outcome);

    match outcome {
        Ok(MigrationReport::NothingToDo) => {
            println!("Nothing to migrate: no stacks outside {}", config.cluster_id);
        }
        Ok(MigrationReport::Migrated { stacks }) => {
            println!(
                "All clear: {} stack(s) migrated to {} and started:",
                stacks.len(),
                config.cluster_id
            );
            for name in &stacks {
                println!("\t{name}");
            }
        }
        Err(StackshiftError::ConvergenceTimeout { stragglers }) => {
            println!(
                "The following stacks could not be stopped and need to be removed in the \
                 Docker CLI with `sudo docker rm STACK_NAME` before migrating:"
            );
            for name in &stragglers {
                println!("\t{name}");
            }
        }
        Err(err) => return Err(err.into()),
    }

    Ok(ExitCode::from(status))
}

/// Process exit status for a finished run.
///
/// Both successful reports exit 0; stragglers exit 2 so scripts can tell
/// manual cleanup apart from other failures.
pub fn exit_status(outcome: &stackshift_core::Result<MigrationReport>) -> u8 {
    match outcome {
        Ok(MigrationReport::NothingToDo | MigrationReport::Migrated { .. }) => EXIT_OK,
        Err(err) if err.is_convergence_timeout() => EXIT_STRAGGLERS,
        Err(_) => EXIT_FAILURE,
    }
}
