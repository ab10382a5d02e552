use std::fmt;

use storefront_api::StoreError;
use storefront_cache::CacheError;
use thiserror::Error;

/// All the ways things can go wrong in the storefront
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, including timeouts
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-2xx response or a payload we couldn't make sense of
    #[error("Server error: {0}")]
    ServerError(String),

    /// The request was superseded. Never shown to the user.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    CacheError(#[from] CacheError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout(_) | StoreError::NetworkError(_) => {
                Error::NetworkError(err.to_string())
            }
            StoreError::Status { .. } | StoreError::ParseError(_) => {
                Error::ServerError(err.to_string())
            }
            StoreError::NotFound(what) => Error::NotFound(what),
        }
    }
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Cloneable summary that can live in controller state
    pub fn info(&self) -> ErrorInfo {
        let kind = match self {
            Error::NetworkError(_) => ErrorKind::Network,
            Error::ServerError(_) => ErrorKind::Server,
            Error::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        };

        ErrorInfo {
            kind,
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    NotFound,
    Other,
}

/// What a list shows in its error state or footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
