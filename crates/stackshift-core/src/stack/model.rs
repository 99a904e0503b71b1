//! Stack domain model.
//!
//! Stacks are never built locally in production code: every value is a snapshot
//! of `/api/stacks` and goes stale as soon as a stop, migrate or start is issued.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a stack as reported by the management API.
///
/// The API encodes this as an integer: `1` is active, `2` is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum StackStatus {
    Running,
    Stopped,
    Other(i64),
}

impl From<i64> for StackStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Running,
            2 => Self::Stopped,
            other => Self::Other(other),
        }
    }
}

impl From<StackStatus> for i64 {
    fn from(status: StackStatus) -> Self {
        match status {
            StackStatus::Running => 1,
            StackStatus::Stopped => 2,
            StackStatus::Other(code) => code,
        }
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Stopped => f.write_str("stopped"),
            Self::Other(code) => write!(f, "unknown({code})"),
        }
    }
}

/// A deployable workload unit bound to one swarm cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stack {
    pub id: u64,
    pub name: String,
    pub endpoint_id: u64,
    /// Current cluster binding. Empty for stacks that are not swarm stacks.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub swarm_id: String,
    pub status: StackStatus,
}

impl Stack {
    /// Whether the stack is already bound to `cluster_id`.
    pub fn is_on_cluster(&self, cluster_id: &str) -> bool {
        self.swarm_id == cluster_id
    }

    pub fn is_running(&self) -> bool {
        self.status == StackStatus::Running
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
