//! Stack API trait.
//!
//! Defines the operations the migration workflow needs from the management API.

use async_trait::async_trait;

use super::model::Stack;
use crate::error::Result;

/// Result of a stop request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The server accepted the stop.
    Stopped,
    /// The server reported the stack was not running.
    AlreadyInactive,
}

/// Result of a migrate request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// The stack was reassigned to the target cluster.
    Migrated,
    /// The stack was already bound to the target cluster; nothing was sent.
    AlreadyOnTarget,
}

/// An authenticated connection to the management API.
///
/// Implementations only exist once authentication and the version query have
/// completed, so every method may assume a ready session.
///
/// # Implementation Notes
///
/// - Any non-200 response other than the "already inactive" stop reply
///   surfaces as [`crate::StackshiftError::Api`].
/// - `migrate_stack` must not touch the network when the stack is already on
///   the target cluster.
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Fetches the full, unfiltered stack inventory.
    async fn list_stacks(&self) -> Result<Vec<Stack>>;

    /// Requests that a stack be stopped.
    async fn stop_stack(&self, stack: &Stack) -> Result<StopOutcome>;

    /// Requests that a stack be started.
    async fn start_stack(&self, stack: &Stack) -> Result<()>;

    /// Reassigns a stack to `target_cluster_id`.
    async fn migrate_stack(&self, stack: &Stack, target_cluster_id: &str)
    -> Result<MigrateOutcome>;
}
