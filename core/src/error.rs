//! Error types for the address lookup client.
//!
//! # Design
//! Two kinds only. `InvalidArgument` is raised locally before any request
//! is built. Everything that goes wrong after that point, whether the
//! network, the HTTP status, the JSON body or the service's own status
//! flag, collapses into `Service`. The `origin` tag lets callers tell the
//! sources apart without widening the taxonomy.

use thiserror::Error;

/// Where a `Service` error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorOrigin {
    /// Connection failure or non-2xx HTTP status.
    Transport,
    /// Body was not valid JSON or did not have the envelope shape.
    InvalidResponse,
    /// Well-formed envelope with `sokStatus.ok == false`.
    Remote,
}

/// Errors returned by `AddressClient` operations.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Caller input violated a precondition. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote call failed or the service rejected the query.
    #[error("{message}")]
    Service {
        origin: ServiceErrorOrigin,
        message: String,
    },
}

impl AddressError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        AddressError::Service {
            origin: ServiceErrorOrigin::Transport,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        AddressError::Service {
            origin: ServiceErrorOrigin::InvalidResponse,
            message: message.into(),
        }
    }

    pub(crate) fn remote(message: impl Into<String>) -> Self {
        AddressError::Service {
            origin: ServiceErrorOrigin::Remote,
            message: message.into(),
        }
    }

    /// The human-readable message, without the `invalid argument:` prefix.
    pub fn message(&self) -> &str {
        match self {
            AddressError::InvalidArgument(msg) => msg,
            AddressError::Service { message, .. } => message,
        }
    }

    /// `Some(origin)` for service errors, `None` for invalid arguments.
    pub fn origin(&self) -> Option<ServiceErrorOrigin> {
        match self {
            AddressError::InvalidArgument(_) => None,
            AddressError::Service { origin, .. } => Some(*origin),
        }
    }
}

/// Failure reported by a `Transport` before any response was received.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

impl From<TransportError> for AddressError {
    fn from(err: TransportError) -> Self {
        AddressError::transport(err.0)
    }
}
