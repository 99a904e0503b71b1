use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stackshift_infrastructure::{MigrationConfig, PortainerClient, StackshiftPaths};

/// Resolves and loads the configuration, applying a `--cluster-id` override.
pub fn load_config(
    explicit: Option<PathBuf>,
    cluster_id: Option<String>,
) -> Result<MigrationConfig> {
    let working_dir = env::current_dir().context("Failed to get current directory")?;
    let path = StackshiftPaths::resolve_config_file(explicit.as_deref(), &working_dir)
        .context("Failed to locate configuration file")?;

    if explicit.is_some() && !path.is_file() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let config = MigrationConfig::load(&path)
        .with_context(|| format!("Failed to load configuration ({})", path.display()))?;

    Ok(match cluster_id {
        Some(id) => config.with_cluster_id(id),
        None => config,
    })
}

/// Logs in and returns a client bound to a ready session.
pub async fn connect(config: &MigrationConfig) -> Result<PortainerClient> {
    PortainerClient::authenticate(&config.url, &config.credentials)
        .await
        .with_context(|| format!("Failed to log in to {}", config.url))
}
