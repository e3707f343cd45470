use serde::Serialize;
use thiserror::Error;

use crate::messages;

/// Coarse classification of a failed lookup, used to pick the message shown
/// to the user and the HTTP status returned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    ConnectionError,
    NotFound,
    Unknown,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("OMDb rate limit reached (HTTP 429)")]
    RateLimited,

    #[error("OMDb returned HTTP {status}")]
    Status { status: u16 },

    #[error("request to OMDb failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body that is not a JSON envelope.
    #[error("could not decode OMDb response: {reason}")]
    Decode { reason: String },

    /// The API answered 2xx with `Response: "False"`, or a success without results.
    #[error("no match: {}", .message.as_deref().unwrap_or("no message from OMDb"))]
    NotFound { message: Option<String> },

    #[error("unexpected OMDb response: {reason}")]
    Malformed { reason: String },
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::RateLimited => ErrorKind::RateLimited,
            SearchError::Status { .. }
            | SearchError::Transport(_)
            | SearchError::Decode { .. } => ErrorKind::ConnectionError,
            SearchError::NotFound { .. } => ErrorKind::NotFound,
            SearchError::Malformed { .. } => ErrorKind::Unknown,
        }
    }

    /// Message shown to the user. `not_found` is used when the API reported no
    /// match without saying why.
    pub fn user_message(&self, not_found: &str) -> String {
        match self {
            SearchError::RateLimited => messages::RATE_LIMITED.to_string(),
            SearchError::Status { .. }
            | SearchError::Transport(_)
            | SearchError::Decode { .. } => messages::CONNECTION_FAILED.to_string(),
            SearchError::NotFound { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(not_found)
                .to_string(),
            SearchError::Malformed { .. } => messages::UNKNOWN_ERROR.to_string(),
        }
    }

    pub fn into_user_error(self, not_found: &str) -> UserError {
        UserError {
            kind: self.kind(),
            message: self.user_message(not_found),
        }
    }
}

/// A failure after it has been caught and turned into something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserError {
    pub kind: ErrorKind,
    pub message: String,
}
