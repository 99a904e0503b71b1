//! Partitioning of the stack inventory by cluster binding.

use super::model::Stack;

/// Returns every stack not bound to `target_cluster_id`, in inventory order.
///
/// Pure and uncached: callers re-fetch the inventory and call this again
/// whenever they need a fresh view.
pub fn orphaned_stacks(inventory: &[Stack], target_cluster_id: &str) -> Vec<Stack> {
    inventory
        .iter()
        .filter(|stack| !stack.is_on_cluster(target_cluster_id))
        .cloned()
        .collect()
}
