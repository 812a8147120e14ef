pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use client::AdvisorClient;
pub use config::Config;
pub use document::{Document, DocumentKind};
pub use error::{ApiError, CONNECTION_ERROR};
pub use models::{AdviceResponse, FeedbackRequest};
pub use session::{Command, Outcome, Session};
pub use state::{ChatState, ConversationTurn, FeedbackForm, LoadState};
