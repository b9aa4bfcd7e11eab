//! The session controller: owns the conversation and runs one turn at a time.
//!
//! A turn is started with [`ChatSession::spawn_turn`], which runs the completion on a
//! tokio task and reports back through a channel, or with [`ChatSession::send`], which
//! awaits it in place. A spawned turn ends in [`ChatSession::finish_turn`]. Either way
//! the user message and the reply are appended and the history file is rewritten.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::display::ERROR_PREFIX;
use crate::context::{Conversation, ConversationStore};
use crate::error::GlossaError;
use crate::llm::{CompletionClient, Message};

/// Outcome of a completion, delivered from the worker task.
#[derive(Debug)]
pub struct TurnEvent {
    pub turn_id: u64,
    pub user: Message,
    pub outcome: Result<String, GlossaError>,
}

/// A finished turn as it was appended to the conversation.
#[derive(Debug)]
pub struct TurnRecord {
    pub user: Message,
    pub reply: Message,
    /// The completion failed and `reply` holds the error text.
    pub failed: bool,
    /// Set when the history file could not be rewritten.
    pub save_error: Option<GlossaError>,
}

struct InFlight {
    turn_id: u64,
    handle: JoinHandle<()>,
}

pub struct ChatSession {
    conversation: Conversation,
    store: ConversationStore,
    client: Arc<dyn CompletionClient>,
    system_instruction: Arc<str>,
    in_flight: Option<InFlight>,
    next_turn_id: u64,
}

impl ChatSession {
    /// Open a session, loading whatever history the store holds.
    pub fn open(
        store: ConversationStore,
        client: Arc<dyn CompletionClient>,
        system_instruction: impl Into<Arc<str>>,
    ) -> Self {
        let conversation = store.load();
        Self::with_conversation(conversation, store, client, system_instruction)
    }

    pub fn with_conversation(
        conversation: Conversation,
        store: ConversationStore,
        client: Arc<dyn CompletionClient>,
        system_instruction: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            conversation,
            store,
            client,
            system_instruction: system_instruction.into(),
            in_flight: None,
            next_turn_id: 0,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// A turn has started and not finished or been cancelled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn begin_turn(&self, text: &str) -> Result<(Message, Vec<Message>), GlossaError> {
        if self.is_busy() {
            return Err(GlossaError::TurnInProgress);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(GlossaError::EmptyInput);
        }

        let user = Message::user(text);
        let context = self.conversation.with_pending(&user);
        Ok((user, context))
    }

    /// Start a turn on a background task. The result arrives on `tx` and must be
    /// passed to [`finish_turn`](Self::finish_turn).
    ///
    /// Returns the user message so it can be shown right away.
    pub fn spawn_turn(
        &mut self,
        text: &str,
        tx: mpsc::UnboundedSender<TurnEvent>,
    ) -> Result<Message, GlossaError> {
        let (user, context) = self.begin_turn(text)?;
        let turn_id = self.next_turn_id;
        self.next_turn_id += 1;

        let client = Arc::clone(&self.client);
        let instruction = Arc::clone(&self.system_instruction);
        let event_user = user.clone();
        let handle = tokio::spawn(async move {
            let outcome = client.complete(&instruction, &context).await;
            // Receiver gone means the UI has shut down.
            let _ = tx.send(TurnEvent {
                turn_id,
                user: event_user,
                outcome,
            });
        });

        self.in_flight = Some(InFlight { turn_id, handle });
        Ok(user)
    }

    /// Record a finished turn: append both messages and rewrite the history file.
    ///
    /// Returns `None` for an event that belongs to a cancelled turn.
    pub fn finish_turn(&mut self, event: TurnEvent) -> Option<TurnRecord> {
        match &self.in_flight {
            Some(in_flight) if in_flight.turn_id == event.turn_id => {}
            _ => {
                tracing::debug!(turn_id = event.turn_id, "dropping reply for a cancelled turn");
                return None;
            }
        }
        self.in_flight = None;
        Some(self.record(event.user, event.outcome))
    }

    /// Run a whole turn in place.
    ///
    /// Dropping the future before it resolves abandons the turn and leaves the
    /// session idle with nothing recorded.
    pub async fn send(&mut self, text: &str) -> Result<TurnRecord, GlossaError> {
        let (user, context) = self.begin_turn(text)?;
        let outcome = self
            .client
            .complete(&self.system_instruction, &context)
            .await;
        Ok(self.record(user, outcome))
    }

    /// Abort the in-flight request. Nothing is appended for it.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.handle.abort();
                tracing::info!(turn_id = in_flight.turn_id, "turn cancelled");
                true
            }
            None => false,
        }
    }

    fn record(&mut self, user: Message, outcome: Result<String, GlossaError>) -> TurnRecord {
        let (reply, failed) = match outcome {
            Ok(text) => (Message::model(text), false),
            Err(e) => {
                tracing::warn!("completion failed: {e}");
                (Message::model(format!("{ERROR_PREFIX}{e}")), true)
            }
        };

        self.conversation.push_turn(user.clone(), reply.clone());

        let save_error = match self.store.save(&self.conversation) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.store.path().display(),
                    "failed to save conversation history: {e}"
                );
                Some(e)
            }
        };

        TurnRecord {
            user,
            reply,
            failed,
            save_error,
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
