//! Error types for the movie service client.
//!
//! # Design
//! Callers see exactly one error type, `ApiError`. Whatever went wrong, an
//! `ApiError` carries a short `status_text` label and a human-readable
//! `message`. For HTTP error statuses the message is the raw response body;
//! for transport faults it is the fault description.
//!
//! The underlying failure is kept as a tagged `ErrorCause`, so callers that
//! need to tell a 404 from a timeout can match on it without downcasting.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::http::HttpResponse;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// `status_text` for failures where no response was obtained.
pub const TRANSPORT_ERROR: &str = "transport error";

/// `status_text` for failures outside the HTTP exchange itself.
pub const UNEXPECTED_ERROR: &str = "unexpected error";

/// A failure below the HTTP semantics layer: no usable response was received.
#[derive(Debug, Error)]
pub enum TransportFault {
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The peer closed or reset the connection before a full response arrived.
    #[error("Connection prematurely closed BEFORE response: {0}")]
    PrematureClose(String),

    /// The status line arrived but the connection ended mid-body.
    #[error("Connection closed before the response body was complete: {0}")]
    TruncatedBody(String),

    /// The connection could not be established (refused, DNS, unreachable).
    #[error("could not connect: {0}")]
    Connect(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// What actually went wrong behind an `ApiError`.
#[derive(Debug, Error)]
pub enum ErrorCause {
    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Transport(TransportFault),

    /// Request construction or response decoding failed.
    #[error(transparent)]
    Unexpected(BoxError),
}

/// The single error returned by every `MoviesClient` operation.
#[derive(Debug)]
pub struct ApiError {
    status_text: String,
    message: String,
    cause: ErrorCause,
}

impl ApiError {
    /// Build from a non-2xx response: reason phrase plus the raw body.
    pub fn from_status(response: &HttpResponse) -> Self {
        Self {
            status_text: response.status_text().to_string(),
            message: response.body.clone(),
            cause: ErrorCause::Status {
                status: response.status,
            },
        }
    }

    pub fn from_fault(fault: TransportFault) -> Self {
        Self {
            status_text: TRANSPORT_ERROR.to_string(),
            message: fault.to_string(),
            cause: ErrorCause::Transport(fault),
        }
    }

    pub fn unexpected(error: impl Into<BoxError>) -> Self {
        let error = error.into();
        Self {
            status_text: UNEXPECTED_ERROR.to_string(),
            message: error.to_string(),
            cause: ErrorCause::Unexpected(error),
        }
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &ErrorCause {
        &self.cause
    }

    /// The HTTP status, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            ErrorCause::Status { status } => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status_text, self.message)
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}
