use std::fmt;

use stackshift_core::{ApiCapabilities, ServerVersion};

/// An authenticated session with a known server version.
///
/// Only produced by a successful login followed by the version query, and
/// never changed afterwards.
#[derive(Clone)]
pub struct ReadySession {
    base_url: String,
    token: String,
    version: ServerVersion,
    capabilities: ApiCapabilities,
}

impl ReadySession {
    pub(crate) fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        version: ServerVersion,
    ) -> Self {
        let capabilities = version.capabilities();
        Self {
            base_url: base_url.into(),
            token: token.into(),
            version,
            capabilities,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> &ServerVersion {
        &self.version
    }

    pub fn capabilities(&self) -> ApiCapabilities {
        self.capabilities
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for ReadySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySession")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("version", &self.version)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
