//! Server version and the request-shaping capabilities derived from it.

use std::fmt;

use semver::Version;

use crate::error::{Result, StackshiftError};

/// First server release that requires `endpointId` on stack start/stop.
pub const ENDPOINT_QUERY_PARAM_SINCE: Version = Version::new(2, 19, 0);

/// A parsed management API server version.
///
/// Only major.minor.patch take part in comparisons; build suffixes such as
/// `-CE` are kept for display but ignored when ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVersion {
    raw: String,
    core: Version,
}

impl ServerVersion {
    /// Parses a version string as reported by `/api/system/version`.
    ///
    /// Well-formed semantic versions go through `semver`; `v2.19.0` and
    /// `2.19` are accepted by a lenient fallback that pads missing parts.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let core = match Version::parse(trimmed) {
            Ok(version) => Version::new(version.major, version.minor, version.patch),
            Err(_) => Self::parse_lenient(trimmed)?,
        };

        Ok(Self {
            raw: trimmed.to_string(),
            core,
        })
    }

    fn parse_lenient(trimmed: &str) -> Result<Version> {
        let stripped = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let numeric = stripped
            .split(|c: char| c == '-' || c == '+')
            .next()
            .unwrap_or_default();

        let mut parts = numeric.split('.');
        let mut next = |name: &str| -> Result<u64> {
            match parts.next() {
                None => Ok(0),
                Some(part) => part.parse::<u64>().map_err(|_| {
                    StackshiftError::version(format!("'{trimmed}' has a non-numeric {name}"))
                }),
            }
        };
        let major = next("major")?;
        let minor = next("minor")?;
        let patch = next("patch")?;

        if numeric.is_empty() || parts.next().is_some() {
            return Err(StackshiftError::version(format!(
                "'{trimmed}' is not a semantic version"
            )));
        }

        Ok(Version::new(major, minor, patch))
    }

    pub fn as_semver(&self) -> &Version {
        &self.core
    }

    /// Resolves what the server expects on the wire.
    pub fn capabilities(&self) -> ApiCapabilities {
        ApiCapabilities {
            endpoint_query_param: self.core >= ENDPOINT_QUERY_PARAM_SINCE,
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Wire-protocol differences between server releases, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiCapabilities {
    /// Stack start/stop must carry `?endpointId=<id>`.
    pub endpoint_query_param: bool,
}
