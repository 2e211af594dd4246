//! Gateway errors.

use thiserror::Error;

/// Errors that can occur when calling the portal API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, reset).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Non-success status without an error message in the body.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The API reported an error in an `{"error": "..."}` body.
    #[error("{0}")]
    Application(String),

    /// The configured base URL cannot have paths appended to it.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Message reported by the API itself, if this is an application error.
    #[must_use]
    pub fn application_message(&self) -> Option<&str> {
        match self {
            Self::Application(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the request failed before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
