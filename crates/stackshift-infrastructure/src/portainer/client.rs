//! PortainerClient - REST implementation of [`StackApi`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use stackshift_core::{
    ApiError, ApiFailure, MigrateOutcome, Result, ServerVersion, Stack, StackApi, StackshiftError,
    StopOutcome,
};
use tracing::{debug, info};

use super::request::{
    AuthRequest, AuthResponse, Lifecycle, MigrateRequest, VersionResponse, auth_url,
    lifecycle_url, migrate_url, stacks_url, version_url,
};
use super::session::ReadySession;
use crate::config::Credentials;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Portainer stack endpoints.
///
/// The only way to obtain one is [`PortainerClient::authenticate`], so every
/// stack operation runs against a [`ReadySession`].
#[derive(Debug, Clone)]
pub struct PortainerClient {
    http: Client,
    session: ReadySession,
}

/// Status and body of a completed HTTP exchange.
struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn into_result(self) -> std::result::Result<String, ApiFailure> {
        if self.status == StatusCode::OK {
            Ok(self.body)
        } else {
            Err(ApiFailure::classify(self.status.as_u16(), &self.body))
        }
    }
}

async fn send(request: RequestBuilder, what: &str) -> Result<Reply> {
    let response = request
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| StackshiftError::transport(format!("{what} request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StackshiftError::transport(format!("Failed to read {what} response: {e}")))?;

    debug!(request = what, status = status.as_u16(), bytes = body.len(), "Response received");
    Ok(Reply { status, body })
}

impl PortainerClient {
    /// Logs in and queries the server version.
    ///
    /// A rejected login is fatal and surfaces as
    /// [`StackshiftError::Authentication`].
    pub async fn authenticate(base_url: &str, credentials: &Credentials) -> Result<Self> {
        Self::authenticate_with(Client::new(), base_url, credentials).await
    }

    /// Same as [`authenticate`](Self::authenticate) with a caller-built HTTP client.
    pub async fn authenticate_with(
        http: Client,
        base_url: &str,
        credentials: &Credentials,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        info!(url = %base_url, username = %credentials.username, "Authenticating");

        let request = http
            .post(auth_url(base_url))
            .header(CONTENT_TYPE, "application/json")
            .json(&AuthRequest {
                username: &credentials.username,
                password: &credentials.password,
            });
        let reply = send(request, "login").await?;
        if reply.status != StatusCode::OK {
            return Err(StackshiftError::Authentication(ApiError::from_body(
                reply.status.as_u16(),
                &reply.body,
            )));
        }
        let token = serde_json::from_str::<AuthResponse>(&reply.body)?.jwt;

        let request = http
            .get(version_url(base_url))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json");
        let body = send(request, "version").await?.into_result()?;
        let raw_version = serde_json::from_str::<VersionResponse>(&body)?.server_version;
        let version = ServerVersion::parse(&raw_version)?;

        let session = ReadySession::new(base_url, token, version);
        info!(
            version = %session.version(),
            endpoint_query_param = session.capabilities().endpoint_query_param,
            "Authenticated"
        );

        Ok(Self { http, session })
    }

    pub fn session(&self) -> &ReadySession {
        &self.session
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, self.session.bearer())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn post_lifecycle(&self, stack: &Stack, action: Lifecycle) -> Result<Reply> {
        let url = lifecycle_url(&self.session, stack, action);
        debug!(url = %url, "POST");
        send(self.authorized(self.http.post(url)), "stack lifecycle").await
    }
}

#[async_trait]
impl StackApi for PortainerClient {
    async fn list_stacks(&self) -> Result<Vec<Stack>> {
        let request = self.authorized(self.http.get(stacks_url(&self.session)));
        let body = send(request, "stack list").await?.into_result()?;
        let stacks: Vec<Stack> = serde_json::from_str(&body)?;
        debug!(count = stacks.len(), "Fetched stack inventory");
        Ok(stacks)
    }

    async fn stop_stack(&self, stack: &Stack) -> Result<StopOutcome> {
        debug!(stack = %stack.name, "Stopping");
        match self.post_lifecycle(stack, Lifecycle::Stop).await?.into_result() {
            Ok(_) => Ok(StopOutcome::Stopped),
            Err(ApiFailure::StackAlreadyInactive) => {
                info!(stack = %stack.name, "Stack is already inactive");
                Ok(StopOutcome::AlreadyInactive)
            }
            Err(failure) => Err(failure.into()),
        }
    }

    async fn start_stack(&self, stack: &Stack) -> Result<()> {
        debug!(stack = %stack.name, "Starting");
        self.post_lifecycle(stack, Lifecycle::Start)
            .await?
            .into_result()?;
        Ok(())
    }

    async fn migrate_stack(
        &self,
        stack: &Stack,
        target_cluster_id: &str,
    ) -> Result<MigrateOutcome> {
        if stack.is_on_cluster(target_cluster_id) {
            info!(stack = %stack.name, "Stack already exists on the new swarm");
            return Ok(MigrateOutcome::AlreadyOnTarget);
        }

        let request = self
            .authorized(self.http.post(migrate_url(&self.session, stack)))
            .json(&MigrateRequest::new(stack, target_cluster_id));
        send(request, "stack migrate").await?.into_result()?;
        Ok(MigrateOutcome::Migrated)
    }
}
