//! Route error responses
//!
//! Every demo route returns `Result<_, Error>`. Failures are rendered as a
//! JSON body with the status code chosen by error kind, so a failed token
//! exchange never turns into a redirect carrying an empty token.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

use crate::metrics;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sign(#[from] adobe_sign::Error),

    #[error("library document not found: {0}")]
    TemplateNotFound(String),

    #[error("widget response has no embeddable content")]
    EmptyWidget,

    #[error("unknown or expired OAuth state")]
    InvalidState,
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Sign(adobe_sign::Error::MissingInput("access token")) => {
                StatusCode::UNAUTHORIZED
            }
            Error::Sign(adobe_sign::Error::MissingInput(_)) => StatusCode::BAD_REQUEST,
            Error::Sign(adobe_sign::Error::Auth { .. }) => StatusCode::UNAUTHORIZED,
            Error::Sign(adobe_sign::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Sign(adobe_sign::Error::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Sign(_) => StatusCode::BAD_GATEWAY,
            Error::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyWidget => StatusCode::BAD_GATEWAY,
            Error::InvalidState => StatusCode::BAD_REQUEST,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::Sign(e) => e.kind(),
            Error::TemplateNotFound(_) => "template_not_found",
            Error::EmptyWidget => "empty_widget",
            Error::InvalidState => "invalid_state",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        if let Error::Sign(_) = self {
            metrics::record_sign_api_error(kind);
        }
        warn!(error = %self, kind, status = status.as_u16(), "request failed");

        (
            status,
            axum::Json(serde_json::json!({
                "error": self.to_string(),
                "kind": kind,
            })),
        )
            .into_response()
    }
}
