pub mod config;
pub mod paths;
pub mod portainer;

pub use crate::config::{Credentials, MigrationConfig};
pub use crate::paths::StackshiftPaths;
pub use crate::portainer::{PortainerClient, ReadySession};
