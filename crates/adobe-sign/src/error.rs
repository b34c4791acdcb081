//! Error types for Adobe Sign API calls

use reqwest::StatusCode;

/// Errors from Adobe Sign client operations.
///
/// Every failure is returned to the caller; nothing is converted into an
/// empty value. `Auth` and `NotFound` are split out of `Api` so callers can
/// react to a revoked token or a missing resource without parsing bodies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("authentication rejected ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("Adobe Sign returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Classify a non-success HTTP status.
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Error::Auth {
                status: status.as_u16(),
                body,
            },
            404 => Error::NotFound(body),
            code => Error::Api { status: code, body },
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingInput(_) => "missing_input",
            Error::Http(_) => "transport",
            Error::Auth { .. } => "auth",
            Error::NotFound(_) => "not_found",
            Error::Api { .. } => "api",
            Error::InvalidResponse(_) => "invalid_response",
            Error::MissingField(_) => "missing_field",
            Error::Io(_) => "io",
        }
    }
}

/// Result alias for Adobe Sign operations.
pub type Result<T> = std::result::Result<T, Error>;
