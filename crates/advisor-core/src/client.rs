//! HTTP client for the advisory service.
//!
//! The network calls are thin; turning a status and body into a result is
//! done by the pure `classify_*` functions so it can be tested offline.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::document::{Document, DocumentKind};
use crate::error::ApiError;
use crate::models::{AdviceResponse, AskRequest, FeedbackRequest};

#[derive(Clone)]
pub struct AdvisorClient {
    client: Client,
    base_url: String,
}

impl AdvisorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn ask(&self, message: &str) -> Result<AdviceResponse, ApiError> {
        let url = self.url("/ask");
        debug!(%url, chars = message.chars().count(), "asking advisor");

        let request = AskRequest {
            message: message.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::Transport)?;
        classify_ask(status, &body)
    }

    pub async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ApiError> {
        let url = self.url("/feedback");
        debug!(%url, rating = feedback.rating, "submitting feedback");

        let response = self
            .client
            .post(&url)
            .json(feedback)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        classify_feedback(response.status().as_u16())
    }

    pub async fn fetch_document(&self, kind: DocumentKind) -> Result<Document, ApiError> {
        let url = self.url(kind.endpoint());
        debug!(%url, tab = kind.as_str(), "loading document");

        let response = self.client.get(&url).send().await.map_err(ApiError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::Transport)?;
        classify_document(kind, status, &body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Interpret a reply from `/ask`.
pub fn classify_ask(status: u16, body: &str) -> Result<AdviceResponse, ApiError> {
    if is_success(status) {
        let value: Value = serde_json::from_str(body).map_err(ApiError::Decode)?;
        return Ok(AdviceResponse::new(value));
    }

    let (message, body_parsed) = match serde_json::from_str::<Value>(body) {
        Ok(value) => (
            value.get("error").and_then(Value::as_str).map(str::to_string),
            true,
        ),
        Err(_) => (None, false),
    };
    warn!(status, body_parsed, "advisor returned an error");
    Err(ApiError::Status {
        status,
        message,
        body_parsed,
    })
}

/// Interpret a reply from `/feedback`. The body is never read.
pub fn classify_feedback(status: u16) -> Result<(), ApiError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(ApiError::Status {
            status,
            message: None,
            body_parsed: false,
        })
    }
}

/// Interpret a reply from one of the document endpoints.
pub fn classify_document(kind: DocumentKind, status: u16, body: &str) -> Result<Document, ApiError> {
    if !is_success(status) {
        return Err(ApiError::Status {
            status,
            message: None,
            body_parsed: false,
        });
    }
    kind.parse(body).map_err(ApiError::Decode)
}
