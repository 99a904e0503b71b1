//! Top-level migration sequence.

use tokio::time::sleep;
use tracing::info;

use super::controller::StopAndConfirm;
use super::policy::MigrationPolicy;
use crate::error::Result;
use crate::stack::{MigrateOutcome, Stack, StackApi, orphaned_stacks};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationReport {
    /// No stack was bound to a cluster other than the target.
    NothingToDo,
    /// Every orphaned stack was migrated and started, in this order.
    Migrated { stacks: Vec<String> },
}

/// Stops, migrates and restarts every stack not yet on the target cluster.
///
/// Any unrecovered error aborts the run; stacks after the failing one are
/// left untouched.
pub struct MigrationDriver<'a, A: StackApi + ?Sized> {
    api: &'a A,
    target_cluster_id: String,
    policy: MigrationPolicy,
}

impl<'a, A: StackApi + ?Sized> MigrationDriver<'a, A> {
    pub fn new(api: &'a A, target_cluster_id: impl Into<String>, policy: MigrationPolicy) -> Self {
        Self {
            api,
            target_cluster_id: target_cluster_id.into(),
            policy,
        }
    }

    /// Fetches the current orphan set.
    pub async fn orphans(&self) -> Result<Vec<Stack>> {
        let inventory = self.api.list_stacks().await?;
        Ok(orphaned_stacks(&inventory, &self.target_cluster_id))
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        let orphans = self.orphans().await?;
        if orphans.is_empty() {
            info!("Could not find any orphaned stacks");
            return Ok(MigrationReport::NothingToDo);
        }

        info!(
            count = orphans.len(),
            target = %self.target_cluster_id,
            "Found orphaned stacks, beginning migration"
        );

        StopAndConfirm::new(self.api, &self.target_cluster_id, &self.policy)
            .run(&orphans)
            .await?;

        let mut migrated = Vec::with_capacity(orphans.len());
        for stack in &orphans {
            self.migrate_and_start(stack).await?;
            migrated.push(stack.name.clone());
        }

        info!(count = migrated.len(), "All orphaned stacks migrated and started");
        Ok(MigrationReport::Migrated { stacks: migrated })
    }

    async fn migrate_and_start(&self, stack: &Stack) -> Result<()> {
        info!(
            stack = %stack.name,
            stack_id = stack.id,
            from = %stack.swarm_id,
            "Migrating stack"
        );
        match self.api.migrate_stack(stack, &self.target_cluster_id).await? {
            MigrateOutcome::Migrated => {}
            MigrateOutcome::AlreadyOnTarget => {
                info!(stack = %stack.name, "Stack already exists on the target swarm");
            }
        }

        sleep(self.policy.settle_delay).await;

        info!(stack = %stack.name, stack_id = stack.id, "Starting stack");
        self.api.start_stack(stack).await
    }
}
