//! Error type definitions.

use std::fmt;
use thiserror::Error;

/// A `Result` alias where the `Err` case is `directory_purge::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for the directory client.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Missing client ID")]
    MissingClientId,
    #[error("Missing client secret")]
    MissingClientSecret,
    #[error("Missing refresh token")]
    MissingRefreshToken,
    #[error("Invalid access token (make sure there are no invalid characters)")]
    InvalidToken,
    #[error("Failed to setup HTTP client: {0}")]
    HttpClientSetup(reqwest::Error),
    #[error("Failed to deserialize response: {0}")]
    Deserialize(reqwest::Error),
    #[error("Http error: {0}")]
    Http(reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(url::ParseError),
    #[error(transparent)]
    InvalidParams(#[from] serde_qs::Error),
    #[error("Username length must be at least 1, got {0}")]
    InvalidUsernameLength(usize),
    #[error("Invalid username pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Failed to fetch access token: {0}")]
    Auth(String),
    #[error("Failed to list users: {0}")]
    List(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// A non-success response returned by an upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub status: u16,
    pub method: http::Method,
    pub path: String,
    pub body: String,
}

impl std::error::Error for UpstreamError {}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "Received {} on {} {}", self.status, self.method, self.path)
        } else {
            write!(
                f,
                "Received {} on {} {}: {}",
                self.status, self.method, self.path, self.body
            )
        }
    }
}
