//! UI-agnostic application state types
//!
//! This module contains the finite-state values the controller is built
//! from. They don't depend on any specific UI framework.

use crate::models::AdviceResponse;

/// Fetch-on-demand state of one informational tab.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Errored(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    /// Move to `Loading` from `Idle` or `Errored`. Returns false, leaving the
    /// state alone, if a load is in flight or the data is already here.
    pub fn begin(&mut self) -> bool {
        match self {
            LoadState::Idle | LoadState::Errored(_) => {
                *self = LoadState::Loading;
                true
            }
            LoadState::Loading | LoadState::Loaded(_) => false,
        }
    }

    /// Settle a load. Ignored unless the state is `Loading`.
    pub fn finish(&mut self, result: Result<T, String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(message) => LoadState::Errored(message),
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

/// One submitted question and, once it arrives, its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub message: String,
    pub response: Option<AdviceResponse>,
}

/// Where the chat flow is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Submitting(ConversationTurn),
    Answered(ConversationTurn),
    Failed(String),
}

impl ChatState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, ChatState::Submitting(_))
    }

    /// The turn whose response is on screen, if any.
    pub fn answered(&self) -> Option<&ConversationTurn> {
        match self {
            ChatState::Answered(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&AdviceResponse> {
        self.answered().and_then(|turn| turn.response.as_ref())
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ChatState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub const MAX_RATING: u8 = 5;

/// Star rating and comment for the displayed response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackForm {
    pub visible: bool,
    /// 0 means no rating chosen yet.
    pub rating: u8,
    pub comment: String,
    pub sending: bool,
    pub error: Option<String>,
}

impl FeedbackForm {
    pub fn reset(&mut self) {
        self.rating = 0;
        self.comment.clear();
    }

    pub fn has_rating(&self) -> bool {
        (1..=MAX_RATING).contains(&self.rating)
    }
}
