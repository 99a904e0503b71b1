//! Domain core for stackshift: stacks, the orphan filter, server version
//! handling, and the stop / confirm / migrate / restart workflow.
//!
//! Nothing in this crate talks HTTP. The management API is reached through
//! the [`StackApi`] trait, implemented in `stackshift-infrastructure`.

pub mod error;
pub mod migration;
pub mod stack;
pub mod version;

pub use error::{ApiError, ApiFailure, Result, StackshiftError};
pub use migration::{MigrationDriver, MigrationPolicy, MigrationReport, StopAndConfirm};
pub use stack::{MigrateOutcome, Stack, StackApi, StackStatus, StopOutcome};
pub use version::{ApiCapabilities, ServerVersion};
