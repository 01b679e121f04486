use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::Error;

/// Errors that end [`serve`](super::serve).
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Failed to bind listener: {0}")]
    Bind(std::io::Error),
    #[error("Server error: {0}")]
    Server(std::io::Error),
}

impl Error {
    /// The status a route answers with when it fails with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors are answered as plain text so the page can show them as is.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }
        (status, self.to_string()).into_response()
    }
}
