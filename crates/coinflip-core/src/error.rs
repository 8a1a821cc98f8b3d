//! Shared error type across coinflip crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Request parameter failed validation.
    InvalidArgument,
    /// Name already taken.
    Conflict,
    /// Name not registered.
    NotFound,
    /// Malformed input other than a request parameter.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidArgument => "INVALID_ARGUMENT",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CoinFlipError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum CoinFlipError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("metric {name} is not a {expected}")]
    KindMismatch { name: String, expected: &'static str },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CoinFlipError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CoinFlipError::InvalidArgument(_) => ClientCode::InvalidArgument,
            CoinFlipError::DuplicateMetric(_) => ClientCode::Conflict,
            CoinFlipError::UnknownMetric(_) => ClientCode::NotFound,
            CoinFlipError::KindMismatch { .. } => ClientCode::BadRequest,
            CoinFlipError::InvalidConfig(_) => ClientCode::BadRequest,
            CoinFlipError::Internal(_) => ClientCode::Internal,
        }
    }
}
