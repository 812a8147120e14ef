//! Errors returned by the advisory service client.

/// Shown for every request kind when the call never produced a usable reply.
pub const CONNECTION_ERROR: &str =
    "Could not connect to the server. Check your internet connection.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the `error` field of the body when the body was a JSON
    /// object carrying one. `body_parsed` records whether the body was JSON
    /// at all, which decides the fallback text for the chat flow.
    #[error("server returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
        body_parsed: bool,
    },

    /// The request never completed (DNS, connect, TLS, reset, timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 2xx reply whose body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The HTTP client itself could not be built.
    #[error("HTTP client build failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// True when the failure happened before a usable reply arrived.
    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Client(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown in the chat panel when asking a question fails.
    pub fn ask_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } => message.clone(),
            ApiError::Status { status, body_parsed: true, .. } => {
                format!("Server error: {}", status)
            }
            ApiError::Status { status, .. } => format!("Unknown error (status {})", status),
            _ => CONNECTION_ERROR.to_string(),
        }
    }

    /// Text shown on an informational tab when loading it fails.
    pub fn tab_message(&self) -> String {
        match self {
            ApiError::Status { status, .. } => format!("Failed to load: {}", status),
            _ => CONNECTION_ERROR.to_string(),
        }
    }

    /// Text shown under the feedback form when submitting it fails.
    pub fn feedback_message(&self) -> String {
        match self {
            ApiError::Status { status, .. } => format!("Feedback not sent: server error {}", status),
            _ => format!("Feedback not sent: {}", CONNECTION_ERROR),
        }
    }
}
