//! Error types for stackshift.

use std::fmt;

use thiserror::Error;

/// Message the management API returns when a stop is requested for a stack
/// that is not running.
pub const STACK_ALREADY_INACTIVE: &str = "Stack is already inactive";

/// A structured non-200 response from the management API.
///
/// Built from the JSON error body `{message, details}`. When the body is not
/// in that shape the raw text becomes the message and `details` stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub code: u16,
    /// Human readable message reported by the server.
    pub message: String,
    /// Additional details reported by the server.
    pub details: String,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Parses an error response body.
    pub fn from_body(code: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: String,
            #[serde(default)]
            details: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::new(code, parsed.message, parsed.details),
            Err(_) => Self::new(code, body.trim(), ""),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API returned error code {}: {}", self.code, self.message)?;
        if !self.details.is_empty() {
            write!(f, " ({})", self.details)?;
        }
        Ok(())
    }
}

/// Classification of a failed API call, decided where the error body is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// HTTP 400 with the "already inactive" message, returned by stop.
    StackAlreadyInactive,
    /// Any other non-200 response.
    Other(ApiError),
}

impl ApiFailure {
    pub fn classify(code: u16, body: &str) -> Self {
        let error = ApiError::from_body(code, body);
        if error.code == 400 && error.message == STACK_ALREADY_INACTIVE {
            Self::StackAlreadyInactive
        } else {
            Self::Other(error)
        }
    }
}

/// The shared error type for stackshift.
#[derive(Error, Debug, Clone)]
pub enum StackshiftError {
    /// The auth endpoint rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(ApiError),

    /// Any other non-200 API response.
    #[error("{0}")]
    Api(ApiError),

    /// Stop-and-confirm ran out of time with stacks still running.
    #[error("Stacks still running after stop timeout: {}", .stragglers.join(", "))]
    ConvergenceTimeout { stragglers: Vec<String> },

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The server reported a version we could not parse.
    #[error("Invalid server version: {0}")]
    Version(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StackshiftError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Version error
    pub fn version(message: impl Into<String>) -> Self {
        Self::Version(message.into())
    }

    pub fn convergence_timeout(stragglers: Vec<String>) -> Self {
        Self::ConvergenceTimeout { stragglers }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Check if stop-and-confirm gave up on running stacks
    pub fn is_convergence_timeout(&self) -> bool {
        matches!(self, Self::ConvergenceTimeout { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Names of the stacks that still need manual intervention, if any.
    pub fn stragglers(&self) -> &[String] {
        match self {
            Self::ConvergenceTimeout { stragglers } => stragglers,
            _ => &[],
        }
    }

    /// The structured API error carried by this error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Authentication(err) | Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<ApiError> for StackshiftError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<ApiFailure> for StackshiftError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::StackAlreadyInactive => {
                Self::Api(ApiError::new(400, STACK_ALREADY_INACTIVE, ""))
            }
            ApiFailure::Other(err) => Self::Api(err),
        }
    }
}

impl From<serde_json::Error> for StackshiftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StackshiftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StackshiftError>`.
pub type Result<T> = std::result::Result<T, StackshiftError>;
