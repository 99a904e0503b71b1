//! URL and body shapes for the Portainer endpoints.
//!
//! Start and stop have two wire forms: servers from 2.19.0 on need the
//! `endpointId` query parameter, older ones infer it. The choice comes from
//! the session's [`ApiCapabilities`](stackshift_core::ApiCapabilities).

use serde::{Deserialize, Serialize};
use stackshift_core::Stack;

use super::session::ReadySession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Start,
    Stop,
}

impl Lifecycle {
    fn segment(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

pub(crate) fn auth_url(base_url: &str) -> String {
    format!("{base_url}/api/auth")
}

pub(crate) fn version_url(base_url: &str) -> String {
    format!("{base_url}/api/system/version")
}

pub(crate) fn stacks_url(session: &ReadySession) -> String {
    format!("{}/api/stacks", session.base_url())
}

pub(crate) fn lifecycle_url(session: &ReadySession, stack: &Stack, action: Lifecycle) -> String {
    let base = format!(
        "{}/api/stacks/{}/{}",
        session.base_url(),
        stack.id,
        action.segment()
    );
    if session.capabilities().endpoint_query_param {
        format!("{base}?endpointId={}", stack.endpoint_id)
    } else {
        base
    }
}

pub(crate) fn migrate_url(session: &ReadySession, stack: &Stack) -> String {
    format!("{}/api/stacks/{}/migrate", session.base_url(), stack.id)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub jwt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VersionResponse {
    pub server_version: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MigrateRequest<'a> {
    #[serde(rename = "endpointID")]
    pub endpoint_id: u64,
    pub name: &'a str,
    #[serde(rename = "swarmID")]
    pub swarm_id: &'a str,
}

impl<'a> MigrateRequest<'a> {
    pub(crate) fn new(stack: &'a Stack, target_cluster_id: &'a str) -> Self {
        Self {
            endpoint_id: stack.endpoint_id,
            name: &stack.name,
            swarm_id: target_cluster_id,
        }
    }
}
