//! State behind the AI therapy view.
//!
//! A conversation only exists once [`AiChat::start`] (or
//! [`AiChat::resume`]) has obtained a session reference from the backend.
//! Sends are split into [`AiChat::begin_send`] and [`AiChat::apply_reply`]
//! so a reply that arrives after [`AiChat::reset`] can be recognised and
//! dropped.

use crate::api::{ApiError, CreateSessionRequest, Credential, SessionKind, SessionRef, TherapyApi};
use crate::core::gate::{ActionGate, Ticket};
use crate::core::message::ChatMessage;
use thiserror::Error;
use tracing::{debug, info};

/// Flat price of an AI session, per hour.
pub const AI_HOURLY_RATE: f64 = 5.0;

pub const START_FAILED: &str = "Failed to start session";
pub const REPLY_FAILED: &str = "Sorry, I couldn't process your message. Please try again.";

/// Price of a session of `minutes` at `hourly_rate`.
pub fn session_cost(hourly_rate: f64, minutes: u32) -> f64 {
    hourly_rate * f64::from(minutes) / 60.0
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("A session is already active")]
    AlreadyStarted,

    #[error("Another request is still in progress")]
    Busy,

    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl ChatError {
    fn backend(source: ApiError, fallback: &str) -> Self {
        ChatError::Backend {
            message: source.user_message(fallback),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// No session yet; nothing was sent.
    NoSession,
    /// Blank input; nothing was sent.
    Empty,
    /// A reply is still pending; nothing was sent.
    Busy,
    Replied,
    Failed,
    /// The view was reset while the request was in flight.
    Stale,
}

/// A message that has been appended locally and is waiting for its reply.
#[derive(Debug)]
pub struct PendingSend {
    ticket: Ticket,
    session: SessionRef,
    text: String,
}

impl PendingSend {
    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Default)]
pub struct AiChat {
    messages: Vec<ChatMessage>,
    session: Option<SessionRef>,
    gate: ActionGate,
}

impl AiChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn session(&self) -> Option<&SessionRef> {
        self.session.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Create an AI session of `minutes` and make it the active one.
    pub async fn start(
        &mut self,
        api: &dyn TherapyApi,
        credential: Option<&Credential>,
        minutes: u32,
    ) -> Result<SessionRef, ChatError> {
        if self.session.is_some() {
            return Err(ChatError::AlreadyStarted);
        }
        let ticket = self.gate.begin().ok_or(ChatError::Busy)?;

        let request = CreateSessionRequest {
            session_type: SessionKind::Ai,
            therapist_id: None,
            duration_minutes: minutes,
            cost: session_cost(AI_HOURLY_RATE, minutes),
        };
        let result = api.create_session(credential, &request).await;

        if !self.gate.finish(ticket) {
            debug!("discarding session created for a reset view");
            return Err(ChatError::Busy);
        }
        let created = result.map_err(|err| ChatError::backend(err, START_FAILED))?;
        info!(session_id = %created.id, minutes, "AI session started");
        self.session = Some(created.id.clone());
        Ok(created.id)
    }

    /// Attach to an existing session and load what was said so far.
    pub async fn resume(
        &mut self,
        api: &dyn TherapyApi,
        credential: Option<&Credential>,
        session: SessionRef,
    ) -> Result<usize, ChatError> {
        let ticket = self.gate.begin().ok_or(ChatError::Busy)?;
        let result = api.chat_history(credential, &session).await;
        if !self.gate.finish(ticket) {
            return Err(ChatError::Busy);
        }
        let history =
            result.map_err(|err| ChatError::backend(err, "Failed to load chat history"))?;

        self.messages.clear();
        for entry in &history {
            self.messages.push(ChatMessage::user(entry.user_message.clone()));
            self.messages.push(ChatMessage::assistant(entry.ai_response.clone()));
        }
        debug!(session_id = %session, exchanges = history.len(), "chat history loaded");
        self.session = Some(session);
        Ok(history.len())
    }

    /// Append `text` as the user's message and claim the gate.
    ///
    /// Returns the reason nothing happened when there is no session, the
    /// text is blank or a reply is still pending.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, SendOutcome> {
        let Some(session) = self.session.clone() else {
            return Err(SendOutcome::NoSession);
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(SendOutcome::Empty);
        }
        let ticket = self.gate.begin().ok_or(SendOutcome::Busy)?;
        self.messages.push(ChatMessage::user(text));
        Ok(PendingSend {
            ticket,
            session,
            text: text.to_string(),
        })
    }

    /// Record the outcome of `pending`, unless the view was reset meanwhile.
    pub fn apply_reply(
        &mut self,
        pending: PendingSend,
        result: Result<String, ApiError>,
    ) -> SendOutcome {
        if !self.gate.finish(pending.ticket) {
            debug!("dropping reply for a reset conversation");
            return SendOutcome::Stale;
        }
        match result {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply));
                SendOutcome::Replied
            }
            Err(err) => {
                debug!(error = %err, "chat message failed");
                self.messages.push(ChatMessage::error(REPLY_FAILED));
                SendOutcome::Failed
            }
        }
    }

    pub async fn send(
        &mut self,
        api: &dyn TherapyApi,
        credential: Option<&Credential>,
        text: &str,
    ) -> SendOutcome {
        let pending = match self.begin_send(text) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = api
            .send_chat_message(credential, pending.session(), pending.text())
            .await;
        self.apply_reply(pending, result)
    }

    /// Forget the conversation. Pending results will be dropped.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.session = None;
        self.gate.invalidate();
    }
}
