//! Shared error type across httpbench crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input or configuration.
    BadRequest,
    /// No handler registered for the path.
    NotFound,
    /// The server is shutting down and no longer takes work.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no route for {0}")]
    NotFound(String),
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("worker pool closed")]
    PoolClosed,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl BenchError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            BenchError::BadConfig(_) => ClientCode::BadRequest,
            BenchError::NotFound(_) => ClientCode::NotFound,
            BenchError::PoolClosed => ClientCode::Unavailable,
            BenchError::Bind { .. }
            | BenchError::Encode(_)
            | BenchError::Io(_)
            | BenchError::Internal(_) => ClientCode::Internal,
        }
    }
}
