//! Client error taxonomy.
//!
//! API failures are a closed status-driven union rather than an open
//! exception hierarchy: one mapping function turns a status code into a
//! kind, and every non-2xx response flows through it.

use thiserror::Error;

/// The closed set of API failure kinds the core service can signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
}

impl ApiErrorKind {
    /// Default message used when the response body carries none.
    pub fn default_message(&self) -> &'static str {
        match self {
            ApiErrorKind::BadRequest => "invalid request",
            ApiErrorKind::Unauthorized => "authentication required",
            ApiErrorKind::Forbidden => "access denied",
            ApiErrorKind::NotFound => "resource not found",
            ApiErrorKind::Internal => "internal server error",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::Internal => "internal error",
        };
        f.write_str(name)
    }
}

/// Map an HTTP status to its error kind. Anything unrecognized is treated
/// as an internal fault.
pub fn kind_for_status(status: u16) -> ApiErrorKind {
    match status {
        400 => ApiErrorKind::BadRequest,
        401 => ApiErrorKind::Unauthorized,
        403 => ApiErrorKind::Forbidden,
        404 => ApiErrorKind::NotFound,
        _ => ApiErrorKind::Internal,
    }
}

/// Escrow client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("{kind} ({status}): {message}")]
    Api {
        kind: ApiErrorKind,
        status: u16,
        message: String,
    },

    /// The request never completed (DNS, TLS, timeout, connection reset).
    /// Kept distinct from `Api`: a network fault is not "not escrowed".
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose body did not parse as the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an `Api` error from a status and (possibly empty) body.
    pub fn from_status(status: u16, body: String) -> Self {
        let kind = kind_for_status(status);
        let message = if body.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            body
        };
        ClientError::Api {
            kind,
            status,
            message,
        }
    }

    /// Kind of the API failure, if this is one.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            ClientError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
