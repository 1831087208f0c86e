//! Error types for the VectorDB client

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by client operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed endpoint or unreadable credential, raised at construction
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied argument failed a precondition; nothing was sent
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Connection failure, disconnect, or a closed session
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server processed the request and reported failure
    #[error("{operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },
}

/// Transport-level failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("session is closed")]
    SessionClosed,

    #[error("server unavailable: {message}")]
    Unavailable { message: String },

    #[error("deadline exceeded: {message}")]
    DeadlineExceeded { message: String },

    #[error("call cancelled: {message}")]
    Cancelled { message: String },

    #[error("stream failed: {message}")]
    Stream { message: String },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn operation(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Operation {
            operation,
            message: message.into(),
        }
    }

    /// True for connection-level failures, including a closed session
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// True if the call failed because the session was closed
    pub fn is_session_closed(&self) -> bool {
        matches!(self, Error::Transport(TransportError::SessionClosed))
    }

    /// Map a non-OK gRPC status onto the error taxonomy
    ///
    /// Channel-level codes become transport errors. Any other code is a
    /// server rejection and keeps the status message verbatim.
    ///
    /// tonic reports an expired client-side timeout as `Cancelled` with the
    /// message "Timeout expired"; that case is a deadline, not a cancellation.
    pub(crate) fn from_status(operation: &'static str, status: tonic::Status) -> Self {
        use tonic::Code;

        let message = status.message().to_string();
        match status.code() {
            Code::Unavailable | Code::Unknown => {
                TransportError::Unavailable { message }.into()
            }
            Code::DeadlineExceeded => TransportError::DeadlineExceeded { message }.into(),
            Code::Cancelled if is_local_timeout(&message) => {
                TransportError::DeadlineExceeded { message }.into()
            }
            Code::Cancelled => TransportError::Cancelled { message }.into(),
            Code::Aborted => TransportError::Stream { message }.into(),
            _ => Error::operation(operation, message),
        }
    }
}

fn is_local_timeout(message: &str) -> bool {
    message == tonic::TimeoutExpired(()).to_string()
}
