//! The view controller.
//!
//! `Session` owns every piece of UI state and never touches the network.
//! Operations that need a request return a [`Command`]; the front end runs it
//! (see [`AdvisorClient::execute`]) and hands the [`Outcome`] back through
//! [`Session::apply`]. A `None` command means the action was a no-op.

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::client::AdvisorClient;
use crate::document::{Document, DocumentKind};
use crate::error::ApiError;
use crate::models::{AdviceResponse, FeedbackRequest};
use crate::state::{ChatState, ConversationTurn, FeedbackForm, LoadState, MAX_RATING};

/// A request the session wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask { message: String },
    /// `turn` numbers the answer being rated.
    Feedback { turn: u64, request: FeedbackRequest },
    Fetch(DocumentKind),
}

/// The result of running a [`Command`].
#[derive(Debug)]
pub enum Outcome {
    Ask(Result<AdviceResponse, ApiError>),
    Feedback { turn: u64, result: Result<(), ApiError> },
    Document(DocumentKind, Result<Document, ApiError>),
}

impl AdvisorClient {
    pub async fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::Ask { message } => Outcome::Ask(self.ask(&message).await),
            Command::Feedback { turn, request } => Outcome::Feedback {
                turn,
                result: self.submit_feedback(&request).await,
            },
            Command::Fetch(kind) => Outcome::Document(kind, self.fetch_document(kind).await),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Question being typed.
    pub input: String,
    pub chat: ChatState,
    pub feedback: FeedbackForm,
    tabs: HashMap<DocumentKind, LoadState<Document>>,
    /// Questions submitted so far.
    turn: u64,
    /// Turn of the feedback in flight.
    feedback_turn: Option<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            chat: ChatState::Idle,
            feedback: FeedbackForm::default(),
            tabs: DocumentKind::all()
                .into_iter()
                .map(|kind| (kind, LoadState::Idle))
                .collect(),
            turn: 0,
            feedback_turn: None,
        }
    }

    // Chat

    /// Send the current input as a question.
    pub fn submit_question(&mut self) -> Option<Command> {
        if self.input.trim().is_empty() || self.chat.is_submitting() {
            return None;
        }

        let message = self.input.clone();
        self.chat = ChatState::Submitting(ConversationTurn {
            message: message.clone(),
            response: None,
        });
        self.turn += 1;
        // Feedback still in flight belongs to the previous answer.
        self.feedback.visible = false;
        self.feedback.sending = false;
        self.feedback.error = None;

        Some(Command::Ask { message })
    }

    pub fn finish_question(&mut self, result: Result<AdviceResponse, ApiError>) {
        if !self.chat.is_submitting() {
            warn!("ignoring advice reply with no question in flight");
            return;
        }
        let ChatState::Submitting(turn) = std::mem::take(&mut self.chat) else {
            return;
        };

        match result {
            Ok(response) => {
                info!("advice received");
                self.chat = ChatState::Answered(ConversationTurn {
                    message: turn.message,
                    response: Some(response),
                });
                self.feedback.visible = true;
            }
            Err(err) => {
                error!(error = %err, "ask failed");
                self.chat = ChatState::Failed(err.ask_message());
            }
        }
    }

    pub fn can_submit_question(&self) -> bool {
        !self.input.trim().is_empty() && !self.chat.is_submitting()
    }

    // Feedback

    /// Choose a star rating. Values outside 1..=5 are ignored.
    pub fn set_rating(&mut self, rating: u8) -> bool {
        if !(1..=MAX_RATING).contains(&rating) {
            return false;
        }
        self.feedback.rating = rating;
        true
    }

    /// Move the rating by `delta`, staying within 1..=5.
    pub fn nudge_rating(&mut self, delta: i8) {
        let next = (self.feedback.rating as i16 + delta as i16).clamp(1, MAX_RATING as i16);
        self.feedback.rating = next as u8;
    }

    pub fn submit_feedback(&mut self) -> Option<Command> {
        if !self.feedback.visible || !self.feedback.has_rating() || self.feedback.sending {
            return None;
        }
        let turn = self.chat.answered()?;
        let response = turn.response.as_ref()?;

        let request = FeedbackRequest::new(
            &turn.message,
            response,
            self.feedback.rating,
            &self.feedback.comment,
        );
        self.feedback.sending = true;
        self.feedback.error = None;
        self.feedback_turn = Some(self.turn);

        Some(Command::Feedback {
            turn: self.turn,
            request,
        })
    }

    pub fn finish_feedback(&mut self, turn: u64, result: Result<(), ApiError>) {
        if !self.feedback.sending || self.feedback_turn != Some(turn) {
            warn!(turn, "ignoring feedback reply that is not for the current answer");
            return;
        }
        self.feedback.sending = false;
        self.feedback_turn = None;

        match result {
            Ok(()) => {
                info!("feedback stored");
                self.feedback.visible = false;
                self.feedback.reset();
            }
            Err(err) => {
                error!(error = %err, "feedback failed");
                self.feedback.error = Some(err.feedback_message());
            }
        }
    }

    /// Hide the feedback form without sending anything.
    pub fn skip_feedback(&mut self) {
        self.feedback.visible = false;
        self.feedback.error = None;
    }

    // Tabs

    pub fn tab(&self, kind: DocumentKind) -> &LoadState<Document> {
        &self.tabs[&kind]
    }

    /// Start loading a tab, or retry it after an error.
    pub fn load_tab(&mut self, kind: DocumentKind) -> Option<Command> {
        let state = self.tabs.entry(kind).or_default();
        if !state.begin() {
            return None;
        }
        Some(Command::Fetch(kind))
    }

    pub fn finish_tab(&mut self, kind: DocumentKind, result: Result<Document, ApiError>) {
        let result = result.map_err(|err| {
            error!(tab = kind.as_str(), error = %err, "document load failed");
            err.tab_message()
        });
        let state = self.tabs.entry(kind).or_default();
        if !state.finish(result) {
            warn!(tab = kind.as_str(), "ignoring document reply with no load in flight");
        }
    }

    /// True if any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.chat.is_submitting()
            || self.feedback.sending
            || self.tabs.values().any(LoadState::is_loading)
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ask(result) => self.finish_question(result),
            Outcome::Feedback { turn, result } => self.finish_feedback(turn, result),
            Outcome::Document(kind, result) => self.finish_tab(kind, result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CONNECTION_ERROR;
    use serde_json::json;

    fn transport_error() -> ApiError {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        ApiError::Transport(err)
    }

    fn status_error(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status,
            message: message.map(str::to_string),
            body_parsed: true,
        }
    }

    fn advice() -> AdviceResponse {
        AdviceResponse::new(json!({
            "advice": "Take the job",
            "reasoning_path": "It pays more",
            "ethical_check": "Nothing concerning",
            "self_reflection": "Limited context",
        }))
    }

    fn answered_session() -> Session {
        let mut session = Session::new();
        session.input = "Should I take the job?".to_string();
        session.submit_question().unwrap();
        session.finish_question(Ok(advice()));
        session
    }

    #[test]
    fn test_submit_emits_one_ask_with_message() {
        let mut session = Session::new();
        session.input = "  How do I negotiate?  ".to_string();

        let command = session.submit_question();
        assert_eq!(
            command,
            Some(Command::Ask {
                message: "  How do I negotiate?  ".to_string()
            })
        );
        assert!(session.chat.is_submitting());
        assert!(!session.can_submit_question());

        // Submit is disabled while in flight.
        assert_eq!(session.submit_question(), None);
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        for input in ["", "   ", "\n\t"] {
            let mut session = Session::new();
            session.input = input.to_string();
            assert_eq!(session.submit_question(), None);
            assert_eq!(session.chat, ChatState::Idle);
            assert_eq!(session.feedback, FeedbackForm::default());
        }
    }

    #[test]
    fn test_blank_input_keeps_previous_answer() {
        let mut session = answered_session();
        session.input = "  ".to_string();
        assert_eq!(session.submit_question(), None);
        assert!(session.chat.response().is_some());
        assert!(session.feedback.visible);
    }

    #[test]
    fn test_success_shows_response_and_feedback() {
        let session = answered_session();
        let response = session.chat.response().unwrap();
        assert_eq!(response.advice(), "Take the job");
        assert_eq!(response.reasoning_path(), "It pays more");
        assert_eq!(response.ethical_check(), "Nothing concerning");
        assert_eq!(response.self_reflection(), "Limited context");
        assert!(session.feedback.visible);
        assert_eq!(session.chat.error(), None);
    }

    #[test]
    fn test_new_question_clears_previous_result() {
        let mut session = answered_session();
        session.input = "Another one".to_string();
        session.submit_question().unwrap();
        assert!(session.chat.response().is_none());
        assert!(!session.feedback.visible);

        session.finish_question(Err(status_error(400, Some("X"))));
        assert_eq!(session.chat.error(), Some("X"));

        session.submit_question().unwrap();
        assert_eq!(session.chat.error(), None);
    }

    #[test]
    fn test_server_error_without_message_mentions_status() {
        let mut session = Session::new();
        session.input = "q".to_string();
        session.submit_question().unwrap();
        session.finish_question(Err(status_error(500, None)));
        assert!(session.chat.error().unwrap().contains("500"));
        assert!(!session.feedback.visible);
    }

    #[test]
    fn test_transport_error_is_fixed_message_for_every_kind() {
        let mut session = Session::new();
        session.input = "q".to_string();
        session.submit_question().unwrap();
        session.finish_question(Err(transport_error()));
        assert_eq!(session.chat.error(), Some(CONNECTION_ERROR));

        for kind in DocumentKind::all() {
            session.load_tab(kind).unwrap();
            session.finish_tab(kind, Err(transport_error()));
            assert_eq!(session.tab(kind).error(), Some(CONNECTION_ERROR));
        }
    }

    #[test]
    fn test_late_reply_is_ignored() {
        let mut session = Session::new();
        session.finish_question(Ok(advice()));
        assert_eq!(session.chat, ChatState::Idle);
        assert!(!session.feedback.visible);
    }

    #[test]
    fn test_tab_loader_lifecycle() {
        for kind in DocumentKind::all() {
            let mut session = Session::new();
            assert_eq!(session.tab(kind), &LoadState::Idle);

            assert_eq!(session.load_tab(kind), Some(Command::Fetch(kind)));
            assert!(session.tab(kind).is_loading());
            assert_eq!(session.load_tab(kind), None);

            session.finish_tab(kind, Err(status_error(503, None)));
            assert_eq!(session.tab(kind).error(), Some("Failed to load: 503"));

            // Retry behaves like the first load.
            assert_eq!(session.load_tab(kind), Some(Command::Fetch(kind)));
            assert!(session.tab(kind).is_loading());
            assert_eq!(session.tab(kind).error(), None);

            let doc = kind.parse(r#"{"title": "Doc"}"#).unwrap();
            session.finish_tab(kind, Ok(doc.clone()));
            assert_eq!(session.tab(kind).data(), Some(&doc));

            // Loaded content is never refreshed.
            assert_eq!(session.load_tab(kind), None);
        }
    }

    #[test]
    fn test_tabs_are_independent() {
        let mut session = Session::new();
        session.load_tab(DocumentKind::Roadmap).unwrap();
        session.load_tab(DocumentKind::Legal).unwrap();
        assert!(session.is_busy());

        session.finish_tab(DocumentKind::Legal, Err(status_error(500, None)));
        assert!(session.tab(DocumentKind::Roadmap).is_loading());
        assert_eq!(session.tab(DocumentKind::Architecture), &LoadState::Idle);
        assert_eq!(session.tab(DocumentKind::Roadmap).error(), None);

        session.finish_tab(
            DocumentKind::Roadmap,
            DocumentKind::Roadmap.parse("{}").map_err(ApiError::Decode),
        );
        assert!(session.tab(DocumentKind::Roadmap).data().is_some());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_feedback_without_rating_is_a_no_op() {
        let mut session = answered_session();
        session.feedback.comment = "great".to_string();
        assert_eq!(session.submit_feedback(), None);
        assert!(!session.feedback.sending);
    }

    #[test]
    fn test_feedback_without_response_is_a_no_op() {
        let mut session = Session::new();
        session.set_rating(4);
        session.feedback.visible = true;
        assert_eq!(session.submit_feedback(), None);
    }

    #[test]
    fn test_feedback_carries_turn_and_resets_on_success() {
        let mut session = answered_session();
        // Editing the input after the answer does not change the feedback.
        session.input = "something else".to_string();
        assert!(session.set_rating(4));
        session.feedback.comment = "helpful".to_string();

        let Some(Command::Feedback { turn, request }) = session.submit_feedback() else {
            panic!("expected a feedback command");
        };
        assert_eq!(turn, 1);
        assert_eq!(request.user_message, "Should I take the job?");
        assert_eq!(request.rating, 4);
        assert_eq!(request.comment, "helpful");
        assert_eq!(request.advisor_response, advice().to_json_string());
        assert_eq!(session.submit_feedback(), None);

        session.finish_feedback(turn, Ok(()));
        assert!(!session.feedback.visible);
        assert_eq!(session.feedback.rating, 0);
        assert!(session.feedback.comment.is_empty());
    }

    #[test]
    fn test_feedback_failure_is_surfaced_and_retryable() {
        let mut session = answered_session();
        session.set_rating(2);
        session.submit_feedback().unwrap();
        session.apply(Outcome::Feedback {
            turn: 1,
            result: Err(status_error(500, None)),
        });

        assert!(session.feedback.visible);
        assert_eq!(session.feedback.rating, 2);
        assert!(session.feedback.error.as_deref().unwrap().contains("500"));
        assert!(session.submit_feedback().is_some());
        assert_eq!(session.feedback.error, None);
    }

    #[test]
    fn test_feedback_reply_for_previous_answer_is_ignored() {
        let mut session = answered_session();
        session.set_rating(5);
        let Some(Command::Feedback { turn: first, .. }) = session.submit_feedback() else {
            panic!("expected a feedback command");
        };

        // A new question goes out before the feedback reply arrives.
        session.input = "And the salary?".to_string();
        session.submit_question().unwrap();
        assert!(!session.feedback.sending);
        session.finish_question(Ok(advice()));
        assert!(session.feedback.visible);

        session.apply(Outcome::Feedback { turn: first, result: Ok(()) });
        assert!(session.feedback.visible);
        assert!(!session.feedback.sending);

        session.set_rating(3);
        let Some(Command::Feedback { turn: second, request }) = session.submit_feedback() else {
            panic!("feedback for the new answer should not be blocked");
        };
        assert_ne!(first, second);
        assert_eq!(request.user_message, "And the salary?");

        session.apply(Outcome::Feedback { turn: first, result: Ok(()) });
        assert!(session.feedback.sending);
        session.apply(Outcome::Feedback { turn: second, result: Ok(()) });
        assert!(!session.feedback.sending);
        assert!(!session.feedback.visible);
    }

    #[test]
    fn test_rating_bounds() {
        let mut session = Session::new();
        assert!(!session.set_rating(0));
        assert!(!session.set_rating(6));
        assert_eq!(session.feedback.rating, 0);

        session.nudge_rating(1);
        assert_eq!(session.feedback.rating, 1);
        session.nudge_rating(10);
        assert_eq!(session.feedback.rating, 5);
        session.nudge_rating(-10);
        assert_eq!(session.feedback.rating, 1);
    }

    #[test]
    fn test_skip_hides_form() {
        let mut session = answered_session();
        session.set_rating(3);
        session.skip_feedback();
        assert!(!session.feedback.visible);
        assert_eq!(session.submit_feedback(), None);
    }
}
