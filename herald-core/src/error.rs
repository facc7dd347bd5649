//! Error taxonomy for resolution and delivery
//!
//! Resolution-time errors (`MalformedDsn`, `UnsupportedScheme`, `IncompleteDsn`)
//! always reach the caller. Only composite transports recover from
//! [`TransportError`], and only by moving on to another child.

use crate::http::HttpError;
use crate::models::MessageKind;
use thiserror::Error;

/// Errors raised while resolving transports or sending messages
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Malformed notification DSN: {reason}")]
    MalformedDsn { reason: String },

    #[error("The \"{scheme}\" scheme is not supported; supported schemes: {}", .supported.join(", "))]
    UnsupportedScheme {
        scheme: String,
        supported: Vec<String>,
    },

    #[error("Invalid \"{dsn}\" notification DSN: option \"{option}\" is required")]
    IncompleteDsn { option: String, dsn: String },

    #[error("The \"{transport}\" transport does not support \"{kind}\" messages")]
    UnsupportedMessageType {
        transport: String,
        kind: MessageKind,
    },

    #[error("{composite} transport must have at least one transport configured")]
    NoTransports { composite: &'static str },

    #[error("The \"{name}\" transport does not exist (available transports: {})", .available.join(", "))]
    UnknownTransport {
        name: String,
        available: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl NotifierError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        NotifierError::MalformedDsn {
            reason: reason.into(),
        }
    }

    /// True for delivery failures a composite may recover from
    pub fn is_transport_error(&self) -> bool {
        matches!(self, NotifierError::Transport(_))
    }
}

/// Delivery failures
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{transport}: request failed: {source}")]
    Http {
        transport: String,
        #[source]
        source: HttpError,
    },

    #[error("{transport}: {reason} (status {status})")]
    Rejected {
        transport: String,
        status: u16,
        reason: String,
    },

    #[error("{transport}: invalid response: {reason}")]
    InvalidResponse { transport: String, reason: String },

    #[error("All transports failed: {}", describe_failures(.0))]
    AllFailed(Vec<NotifierError>),
}

fn describe_failures(errors: &[NotifierError]) -> String {
    if errors.is_empty() {
        return "every supporting transport is waiting for its retry period".to_string();
    }
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("#{} {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, NotifierError>;
