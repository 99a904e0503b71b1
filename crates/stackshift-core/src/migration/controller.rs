//! Stop-and-confirm: stop every orphaned stack and wait until none is running.
//!
//! A successful stop reply does not mean the workload has exited, so the
//! controller samples the inventory until the orphan set has no running
//! stacks, re-issuing stops for stragglers on every sample.

use tokio::time::{Instant, sleep};
use tracing::{error, info, warn};

use super::policy::MigrationPolicy;
use crate::error::{Result, StackshiftError};
use crate::stack::{Stack, StackApi, StopOutcome, orphaned_stacks};

pub struct StopAndConfirm<'a, A: StackApi + ?Sized> {
    api: &'a A,
    target_cluster_id: &'a str,
    policy: &'a MigrationPolicy,
}

impl<'a, A: StackApi + ?Sized> StopAndConfirm<'a, A> {
    pub fn new(api: &'a A, target_cluster_id: &'a str, policy: &'a MigrationPolicy) -> Self {
        Self {
            api,
            target_cluster_id,
            policy,
        }
    }

    /// Stops `orphans` and blocks until no orphaned stack reports running.
    ///
    /// Fails with [`StackshiftError::ConvergenceTimeout`] naming every stack
    /// still running once the poll budget is spent. Any stop failure other
    /// than "already inactive" aborts immediately.
    pub async fn run(&self, orphans: &[Stack]) -> Result<()> {
        for stack in orphans {
            self.request_stop(stack).await?;
        }

        let started = Instant::now();
        loop {
            let elapsed = started.elapsed();
            if elapsed >= self.policy.poll_budget {
                break;
            }
            sleep(self.policy.poll_interval.min(self.policy.poll_budget - elapsed)).await;

            let stragglers = self.running_orphans().await?;
            if stragglers.is_empty() {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "All orphaned stacks stopped"
                );
                return Ok(());
            }

            for stack in &stragglers {
                warn!(stack = %stack.name, stack_id = stack.id, "Couldn't stop stack, retrying");
                self.request_stop(stack).await?;
            }
        }

        // Sample again rather than trusting the last in-loop sample.
        let stragglers = self.running_orphans().await?;
        if stragglers.is_empty() {
            info!("All orphaned stacks stopped");
            return Ok(());
        }

        let names: Vec<String> = stragglers.into_iter().map(|stack| stack.name).collect();
        error!(
            stacks = %names.join(", "),
            "Stacks could not be stopped and need to be removed manually with `docker rm`"
        );
        Err(StackshiftError::convergence_timeout(names))
    }

    async fn running_orphans(&self) -> Result<Vec<Stack>> {
        let inventory = self.api.list_stacks().await?;
        Ok(orphaned_stacks(&inventory, self.target_cluster_id)
            .into_iter()
            .filter(Stack::is_running)
            .collect())
    }

    async fn request_stop(&self, stack: &Stack) -> Result<()> {
        info!(stack = %stack.name, stack_id = stack.id, "Stopping stack");
        match self.api.stop_stack(stack).await {
            Ok(StopOutcome::Stopped) => Ok(()),
            Ok(StopOutcome::AlreadyInactive) => {
                info!(stack = %stack.name, "Stack is already inactive");
                Ok(())
            }
            Err(err) => {
                error!(
                    stack = %stack.name,
                    stack_id = stack.id,
                    error = %err,
                    "Stop request failed"
                );
                Err(err)
            }
        }
    }
}
