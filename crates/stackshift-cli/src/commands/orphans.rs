use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use stackshift_core::{MigrationDriver, MigrationPolicy};

use super::utils::{connect, load_config};

/// Prints the orphan set without touching any stack.
pub async fn run(config: Option<PathBuf>, cluster_id: Option<String>) -> Result<ExitCode> {
    let config = load_config(config, cluster_id)?;
    let client = connect(&config).await?;

    let orphans = MigrationDriver::new(&client, &config.cluster_id, MigrationPolicy::default())
        .orphans()
        .await?;

    if orphans.is_empty() {
        println!("No orphaned stacks: everything is on {}", config.cluster_id);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} stack(s) not on {}:", orphans.len(), config.cluster_id);
    println!("{:>6}  {:<32} {:>8}  {:<28} STATUS", "ID", "NAME", "ENDPOINT", "SWARM");
    for stack in &orphans {
        println!(
            "{:>6}  {:<32} {:>8}  {:<28} {}",
            stack.id, stack.name, stack.endpoint_id, stack.swarm_id, stack.status
        );
    }
    Ok(ExitCode::SUCCESS)
}
