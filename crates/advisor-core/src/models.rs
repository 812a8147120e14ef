//! Wire types for the ask and feedback endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    pub message: String,
}

/// Reply of `POST /ask`, kept exactly as the server sent it.
///
/// Only four string fields are displayed, but the whole object is forwarded
/// to the feedback endpoint, so nothing is dropped on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdviceResponse(Value);

impl AdviceResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn advice(&self) -> String {
        self.field("advice")
    }

    pub fn reasoning_path(&self) -> String {
        self.field("reasoning_path")
    }

    pub fn ethical_check(&self) -> String {
        self.field("ethical_check")
    }

    pub fn self_reflection(&self) -> String {
        self.field("self_reflection")
    }

    /// The labeled blocks in display order.
    pub fn sections(&self) -> [(&'static str, String); 4] {
        [
            ("Advice", self.advice()),
            ("Reasoning", self.reasoning_path()),
            ("Ethical check", self.ethical_check()),
            ("Self-reflection", self.self_reflection()),
        ]
    }

    /// Compact JSON text, as sent in `advisor_response`.
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    fn field(&self, name: &str) -> String {
        self.0.get(name).map(display_text).unwrap_or_default()
    }
}

/// Text shown for a JSON value: strings as-is, null as nothing, anything
/// else as compact JSON.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub user_message: String,
    /// The advice response serialized to a JSON string.
    pub advisor_response: String,
    pub rating: u8,
    pub comment: String,
}

impl FeedbackRequest {
    pub fn new(user_message: &str, response: &AdviceResponse, rating: u8, comment: &str) -> Self {
        Self {
            user_message: user_message.to_string(),
            advisor_response: response.to_json_string(),
            rating,
            comment: comment.to_string(),
        }
    }
}
