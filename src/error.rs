//! Error taxonomy shared by the auth core and the data-store adapters.
//!
//! DESIGN
//! ======
//! Remote failures arrive as [`ProviderError`], which keeps the diagnostic
//! detail for logging. Anything handed to UI code is an [`AuthError`] (or one
//! of the feature errors) carrying only an [`ErrorKind`] and a short
//! user-readable message. Provider types never cross that boundary.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse classification that tells callers how a failure can be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user must change their input (bad credentials, duplicate account).
    Credential,
    /// The network or transport failed; retrying later may succeed.
    Connectivity,
    /// The remote service failed or answered with something unexpected.
    Service,
}

impl ErrorKind {
    /// Whether an identical retry has a reasonable chance of succeeding.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Connectivity | Self::Service)
    }
}

// =============================================================================
// PROVIDER ERROR
// =============================================================================

/// Raw failure reported by the identity provider or the data store.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service refused the request (4xx).
    #[error("request rejected: status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The service failed to handle the request (5xx).
    #[error("service unavailable: status {status}")]
    Unavailable { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The operation needs configuration this process does not have.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}

impl ProviderError {
    /// Classify an HTTP status and body returned by the service.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        if (400..500).contains(&status) {
            Self::Rejected { status, message: body }
        } else {
            Self::Unavailable { status, body }
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Connectivity,
            Self::Rejected { status: 408 | 429, .. } => ErrorKind::Connectivity,
            Self::Rejected { .. } => ErrorKind::Credential,
            Self::Unavailable { .. } | Self::Parse(_) | Self::NotConfigured(_) => ErrorKind::Service,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotConfigured(_) => false,
            other => other.kind().is_retryable(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

// =============================================================================
// AUTH ERROR
// =============================================================================

pub const SIGN_IN_FAILED: &str = "Sign-in failed. Check your credentials and your internet connection.";
pub const SIGN_OUT_FAILED: &str = "Sign-out failed. Please try again.";
pub const SIGN_UP_FAILED: &str = "Account creation failed. Please try again.";
pub const AUTH_SERVICE_UNREACHABLE: &str = "Could not reach the authentication service.";

/// Uniform error returned by the auth facade.
///
/// Only the kind and a fixed message are kept; provider detail is logged
/// at the facade and dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    kind: ErrorKind,
    message: &'static str,
}

impl AuthError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    #[must_use]
    pub fn sign_in(source: &ProviderError) -> Self {
        Self::new(source.kind(), SIGN_IN_FAILED)
    }

    #[must_use]
    pub fn sign_out(source: &ProviderError) -> Self {
        Self::new(source.kind(), SIGN_OUT_FAILED)
    }

    #[must_use]
    pub fn sign_up(source: &ProviderError) -> Self {
        Self::new(source.kind(), SIGN_UP_FAILED)
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

// =============================================================================
// STORAGE ERROR
// =============================================================================

/// Failure of the durable local key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
