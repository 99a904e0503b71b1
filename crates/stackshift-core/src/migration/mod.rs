//! The stop / confirm / migrate / restart workflow.

pub mod controller;
pub mod driver;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::StopAndConfirm;
pub use driver::{MigrationDriver, MigrationReport};
pub use policy::MigrationPolicy;
