//! Stack domain: the remote stack record, the orphan filter, and the API seam.

pub mod api;
pub mod filter;
pub mod model;

pub use api::{MigrateOutcome, StackApi, StopOutcome};
pub use filter::orphaned_stacks;
pub use model::{Stack, StackStatus};
