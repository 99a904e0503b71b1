//! Portainer management API client.

mod client;
mod request;
mod session;

pub use client::PortainerClient;
pub use session::ReadySession;
