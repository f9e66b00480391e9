//! Dashboard Error Types
//!
//! Every API failure collapses into a `{status, message}` shape so callers
//! can surface it without inspecting transport details.

use serde::Serialize;
use thiserror::Error;

use crate::credential::CredentialError;

/// Message shown when the server did not provide one.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred.";

/// API call failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session token is held for an endpoint that requires one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The server rejected the session (HTTP 401).
    #[error("Session invalid: {message}")]
    Unauthorized { message: String },

    /// The action was blocked client-side by the permission gate.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Any other non-success HTTP status.
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("Connection failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The request was rejected before being sent.
    #[error(transparent)]
    Invalid(#[from] nw_common::Error),

    /// The session token could not be decoded or persisted.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ApiError {
    /// HTTP-style status code of the failure.
    ///
    /// Transport and decoding failures report `500`.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotAuthenticated | Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::Status { status, .. } => *status,
            Self::Invalid(_) => 400,
            Self::Credential(CredentialError::Malformed(_) | CredentialError::Expired) => 401,
            Self::Network(_) | Self::InvalidResponse(_) | Self::Credential(_) => 500,
        }
    }

    /// User-facing message: the server's when it sent one.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Status { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::NotAuthenticated | Self::Credential(CredentialError::Malformed(_)) => {
                "Invalid Token".to_string()
            }
            Self::Credential(CredentialError::Expired) => "Session Expired".to_string(),
            Self::Invalid(e) => e.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Whether the failure means the session is no longer valid.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::Unauthorized { .. }
                | Self::Credential(CredentialError::Malformed(_) | CredentialError::Expired)
        )
    }

    /// Uniform `{status, message}` view of the failure.
    pub fn to_failure(&self) -> Failure {
        Failure {
            status: self.status(),
            message: self.message(),
        }
    }
}

/// Uniform failure shape handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub status: u16,
    pub message: String,
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
