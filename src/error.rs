//! Data-layer error types.
//!
//! Remote failures carry an [`ErrorKind`] assigned where the failure is
//! first observed, so downstream policy code branches on a tag instead
//! of matching message substrings.

use thiserror::Error;

use crate::store::StoreError;

/// Classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request exceeded the client timeout.
    Timeout,
    /// Transport-level failure (DNS, connect, TLS).
    Network,
    /// Upstream gateway failure (502/503/504).
    Gateway,
    /// The backend reported the entity does not exist.
    NotFound,
    /// The backend rejected the request payload.
    Validation,
    /// Authentication or permission failure.
    Unauthorized,
    /// Anything else, including malformed response bodies.
    Unknown,
}

impl ErrorKind {
    /// True for failures caused by connectivity rather than the request
    /// itself. These are eligible for offline fallback.
    pub fn is_connectivity(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::Network | ErrorKind::Gateway
        )
    }
}

/// Errors surfaced by repositories and use cases.
///
/// Every variant renders as a single line suitable for direct display.
#[derive(Error, Debug)]
pub enum DataError {
    /// Remote call failed; the message is already normalized.
    #[error("{message}")]
    Remote { kind: ErrorKind, message: String },

    /// Offline and nothing cached for the requested owner.
    #[error("You are offline. No cached data available.")]
    OfflineUnavailable,

    /// Input validation failed; lists every violated field at once.
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A required identifier was empty or absent.
    #[error("Missing required argument: {0}")]
    InvalidArgument(&'static str),

    /// Key-value store failure (I/O or corrupt cached JSON).
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl DataError {
    /// Builds a remote error with the given kind.
    pub fn remote(kind: ErrorKind, message: impl Into<String>) -> Self {
        DataError::Remote {
            kind,
            message: message.into(),
        }
    }

    /// The remote failure kind, when this is a remote error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DataError::Remote { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True when the failure is connectivity-class and a cached value
    /// may be served instead.
    pub fn is_connectivity(&self) -> bool {
        self.kind().is_some_and(ErrorKind::is_connectivity)
    }

    /// True when the backend reported the entity as missing.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}
