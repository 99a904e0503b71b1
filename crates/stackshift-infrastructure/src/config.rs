//! Configuration loading.
//!
//! A TOML file supplies the management API location, credentials, the target
//! cluster and optionally the timing policy. `STACKSHIFT_*` environment
//! variables override individual values, and may stand in for the file.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use stackshift_core::{MigrationPolicy, Result, StackshiftError};
use tracing::debug;

pub const ENV_URL: &str = "STACKSHIFT_URL";
pub const ENV_USERNAME: &str = "STACKSHIFT_USERNAME";
pub const ENV_PASSWORD: &str = "STACKSHIFT_PASSWORD";
pub const ENV_CLUSTER_ID: &str = "STACKSHIFT_CLUSTER_ID";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    portainer: PortainerSection,
    #[serde(default)]
    swarm: SwarmSection,
    #[serde(default)]
    policy: PolicySection,
}

#[derive(Deserialize, Debug, Default)]
struct PortainerSection {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct SwarmSection {
    cluster_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct PolicySection {
    poll_interval_ms: Option<u64>,
    poll_budget_secs: Option<u64>,
    settle_delay_ms: Option<u64>,
}

/// Login credentials for the management API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a migration run needs, loaded once before the driver starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Base URL of the management API, without a trailing slash.
    pub url: String,
    pub credentials: Credentials,
    /// Identifier of the destination swarm cluster.
    pub cluster_id: String,
    pub policy: MigrationPolicy,
}

impl MigrationConfig {
    /// Loads `path` (if it exists) and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = if path.is_file() {
            debug!(path = %path.display(), "Loading configuration file");
            Some(fs::read_to_string(path).map_err(|e| {
                StackshiftError::config(format!(
                    "Failed to read config file at {}: {}",
                    path.display(),
                    e
                ))
            })?)
        } else {
            debug!(path = %path.display(), "No configuration file, using environment only");
            None
        };

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds the configuration from file contents and an environment lookup.
    pub fn from_sources(
        contents: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file: ConfigFile = match contents {
            Some(text) if !text.trim().is_empty() => toml::from_str(text)?,
            _ => ConfigFile::default(),
        };

        let pick = |env_key: &str, from_file: Option<String>, name: &str| -> Result<String> {
            env(env_key)
                .or(from_file)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    StackshiftError::config(format!(
                        "missing '{name}' (set it in the config file or {env_key})"
                    ))
                })
        };

        let url = pick(ENV_URL, file.portainer.url, "portainer.url")?
            .trim_end_matches('/')
            .to_string();
        let username = pick(ENV_USERNAME, file.portainer.username, "portainer.username")?;
        let password = pick(ENV_PASSWORD, file.portainer.password, "portainer.password")?;
        let cluster_id = pick(ENV_CLUSTER_ID, file.swarm.cluster_id, "swarm.cluster_id")?;

        let mut policy = MigrationPolicy::default();
        if let Some(ms) = file.policy.poll_interval_ms {
            if ms == 0 {
                return Err(StackshiftError::config("policy.poll_interval_ms must be > 0"));
            }
            policy.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.policy.poll_budget_secs {
            policy.poll_budget = Duration::from_secs(secs);
        }
        if let Some(ms) = file.policy.settle_delay_ms {
            policy.settle_delay = Duration::from_millis(ms);
        }

        Ok(Self {
            url,
            credentials: Credentials { username, password },
            cluster_id,
            policy,
        })
    }

    /// Replaces the target cluster, e.g. from a command-line flag.
    pub fn with_cluster_id(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = cluster_id.into().trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL: &str = r#"
        [portainer]
        url = " https://portainer.example.com/ "
        username = "admin"
        password = "hunter2"

        [swarm]
        cluster_id = "new-swarm"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parses_file_and_trims_values() {
        let config = MigrationConfig::from_sources(Some(FULL), no_env).unwrap();

        assert_eq!(config.url, "https://portainer.example.com");
        assert_eq!(config.credentials.username, "admin");
        assert_eq!(config.credentials.password, "hunter2");
        assert_eq!(config.cluster_id, "new-swarm");
        assert_eq!(config.policy, MigrationPolicy::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_CLUSTER_ID, "other-swarm"), (ENV_PASSWORD, "s3cret")]);

        let config = MigrationConfig::from_sources(Some(FULL), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.cluster_id, "other-swarm");
        assert_eq!(config.credentials.password, "s3cret");
        assert_eq!(config.credentials.username, "admin");
    }

    #[test]
    fn test_environment_alone_is_enough() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_URL, "http://localhost:9000"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "pw"),
            (ENV_CLUSTER_ID, "abc"),
        ]);

        let config =
            MigrationConfig::from_sources(None, |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.url, "http://localhost:9000");
    }

    #[test]
    fn test_missing_value_names_the_key() {
        let err = MigrationConfig::from_sources(
            Some("[portainer]\nurl = \"http://x\"\nusername = \"a\"\npassword = \"b\"\n"),
            no_env,
        )
        .unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("swarm.cluster_id"));
    }

    #[test]
    fn test_policy_section() {
        let contents = format!(
            "{FULL}\n[policy]\npoll_interval_ms = 250\npoll_budget_secs = 30\nsettle_delay_ms = 0\n"
        );

        let config = MigrationConfig::from_sources(Some(&contents), no_env).unwrap();
        assert_eq!(config.policy.poll_interval, Duration::from_millis(250));
        assert_eq!(config.policy.poll_budget, Duration::from_secs(30));
        assert_eq!(config.policy.settle_delay, Duration::ZERO);
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let contents = format!("{FULL}\n[policy]\npoll_interval_ms = 0\n");
        let err = MigrationConfig::from_sources(Some(&contents), no_env).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let config = MigrationConfig::from_sources(Some(FULL), no_env).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }
}
