//! In-memory `StackApi` used by the controller and driver tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ApiError, Result, StackshiftError};
use crate::stack::{MigrateOutcome, Stack, StackApi, StackStatus, StopOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Stop(u64),
    Start(u64),
    Migrate(u64, String),
}

#[derive(Default)]
struct MockState {
    stacks: Vec<Stack>,
    calls: Vec<Call>,
    /// Number of inventory fetches after the first stop before a stack settles.
    stop_lag: HashMap<u64, usize>,
    pending: HashMap<u64, usize>,
    stubborn: HashSet<u64>,
    /// Stops accepted before every further stop of the stack fails.
    failing_stop: HashMap<u64, usize>,
    failing_start: HashSet<u64>,
}

pub(crate) struct MockStackApi {
    state: Mutex<MockState>,
}

pub(crate) fn stack(id: u64, name: &str, swarm_id: &str, status: StackStatus) -> Stack {
    Stack {
        id,
        name: name.to_string(),
        endpoint_id: 1,
        swarm_id: swarm_id.to_string(),
        status,
    }
}

impl MockStackApi {
    pub(crate) fn new(stacks: Vec<Stack>) -> Self {
        Self {
            state: Mutex::new(MockState {
                stacks,
                ..Default::default()
            }),
        }
    }

    /// The stack keeps running for `fetches` inventory samples after its first stop.
    pub(crate) fn with_stop_lag(self, id: u64, fetches: usize) -> Self {
        self.state.lock().unwrap().stop_lag.insert(id, fetches);
        self
    }

    /// The stack accepts stop requests but never stops.
    pub(crate) fn with_stubborn(self, id: u64) -> Self {
        self.state.lock().unwrap().stubborn.insert(id);
        self
    }

    pub(crate) fn with_failing_stop(self, id: u64) -> Self {
        self.with_failing_stop_after(id, 0)
    }

    /// The first `accepted` stops succeed, later ones fail.
    pub(crate) fn with_failing_stop_after(self, id: u64, accepted: usize) -> Self {
        self.state.lock().unwrap().failing_stop.insert(id, accepted);
        self
    }

    pub(crate) fn with_failing_start(self, id: u64) -> Self {
        self.state.lock().unwrap().failing_start.insert(id);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn stacks(&self) -> Vec<Stack> {
        self.state.lock().unwrap().stacks.clone()
    }

    pub(crate) fn stop_count(&self, id: u64) -> usize {
        self.count(|call| *call == Call::Stop(id))
    }

    pub(crate) fn list_count(&self) -> usize {
        self.count(|call| *call == Call::List)
    }

    /// Calls that touched stack `id` in any way.
    pub(crate) fn calls_for(&self, id: u64) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::List => false,
                Call::Stop(other) | Call::Start(other) | Call::Migrate(other, _) => *other == id,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }
}

fn server_error(message: &str) -> StackshiftError {
    StackshiftError::Api(ApiError::new(500, message, ""))
}

#[async_trait]
impl StackApi for MockStackApi {
    async fn list_stacks(&self) -> Result<Vec<Stack>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);

        let mut settled = Vec::new();
        for (id, remaining) in state.pending.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                settled.push(*id);
            }
        }
        for id in settled {
            state.pending.remove(&id);
            if let Some(stack) = state.stacks.iter_mut().find(|s| s.id == id) {
                stack.status = StackStatus::Stopped;
            }
        }

        Ok(state.stacks.clone())
    }

    async fn stop_stack(&self, stack: &Stack) -> Result<StopOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Stop(stack.id));

        if let Some(&accepted) = state.failing_stop.get(&stack.id) {
            let attempts = state
                .calls
                .iter()
                .filter(|call| **call == Call::Stop(stack.id))
                .count();
            if attempts > accepted {
                return Err(server_error("stop failed"));
            }
        }

        let running = state
            .stacks
            .iter()
            .any(|s| s.id == stack.id && s.is_running());
        if !running {
            return Ok(StopOutcome::AlreadyInactive);
        }
        if state.stubborn.contains(&stack.id) || state.pending.contains_key(&stack.id) {
            return Ok(StopOutcome::Stopped);
        }

        let lag = state.stop_lag.get(&stack.id).copied();
        match lag {
            Some(lag) if lag > 0 => {
                state.pending.insert(stack.id, lag);
            }
            _ => {
                if let Some(s) = state.stacks.iter_mut().find(|s| s.id == stack.id) {
                    s.status = StackStatus::Stopped;
                }
            }
        }
        Ok(StopOutcome::Stopped)
    }

    async fn start_stack(&self, stack: &Stack) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Start(stack.id));

        if state.failing_start.contains(&stack.id) {
            return Err(server_error("start failed"));
        }
        if let Some(s) = state.stacks.iter_mut().find(|s| s.id == stack.id) {
            s.status = StackStatus::Running;
        }
        Ok(())
    }

    async fn migrate_stack(
        &self,
        stack: &Stack,
        target_cluster_id: &str,
    ) -> Result<MigrateOutcome> {
        if stack.is_on_cluster(target_cluster_id) {
            return Ok(MigrateOutcome::AlreadyOnTarget);
        }

        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::Migrate(stack.id, target_cluster_id.to_string()));
        if let Some(s) = state.stacks.iter_mut().find(|s| s.id == stack.id) {
            s.swarm_id = target_cluster_id.to_string();
        }
        Ok(MigrateOutcome::Migrated)
    }
}
