//! Error taxonomy for API client operations.

use thiserror::Error;

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token cannot be used to build request headers.
    #[error("invalid access token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The request never produced a decodable response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}{hint}", hint = auth_hint(.status))]
    Status { status: u16, message: String },
    /// The response did not have the expected envelope shape.
    #[error("unexpected response shape: {0}")]
    Protocol(String),
}

impl ApiError {
    /// Whether the failure happened at the transport layer rather than in
    /// interpreting a well-formed response.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes format arguments by reference"
)]
const fn auth_hint(status: &u16) -> &'static str {
    match *status {
        401 | 403 => " (check that the access token is valid and has not expired)",
        _ => "",
    }
}
