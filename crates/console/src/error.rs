//! Error types of the console client.
//!
//! Every directory failure is terminal for the attempt that produced it: the
//! client never retries, it reports and lets the operator re-invoke.

use thiserror::Error;
use userdesk_core::DomainError;

/// Failure of a call against the remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Login rejected (bad credentials) or the login call itself failed.
    #[error("authentication failed: {message}")]
    Auth { status: Option<u16>, message: String },

    /// Listing or fetching users failed (network or non-2xx).
    #[error("fetch failed: {message}")]
    Fetch { status: Option<u16>, message: String },

    /// Update or delete failed.
    #[error("mutation failed: {message}")]
    Mutation { status: Option<u16>, message: String },
}

impl DirectoryError {
    pub fn auth(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    pub fn mutation(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Mutation {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Fetch { status, .. } | Self::Mutation { status, .. } => {
                *status
            }
        }
    }

    /// Message suitable for showing inline to the operator.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth { message, .. }
            | Self::Fetch { message, .. }
            | Self::Mutation { message, .. } => message,
        }
    }
}

/// Failure of the durable session storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error("session storage failed: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Illegal transition of a mutation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("no dialog is open")]
    NotOpen,

    #[error("a dialog is already open")]
    AlreadyOpen,

    #[error("a request is already in flight")]
    InFlight,

    #[error("no request is in flight")]
    NotSubmitting,
}

/// Failure of a console action, across layers.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Invalid environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to resolve data directory - set USERDESK_DATA_DIR")]
    NoDataDir,
}
