use crate::error::GlossaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One entry of a conversation.
///
/// Serializes to the Gemini content shape, `{"role": "...", "parts": [{"text": "..."}]}`,
/// which is used both on the wire and in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageRecord", into = "MessageRecord")]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageRecord {
    role: Role,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

impl TryFrom<MessageRecord> for Message {
    type Error = String;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let MessageRecord { role, parts } = record;
        // Only the first part carries text we keep.
        let text = parts
            .into_iter()
            .next()
            .map(|p| p.text)
            .ok_or_else(|| format!("{} message has no parts", role.as_str()))?;
        Ok(Self { role, text })
    }
}

impl From<Message> for MessageRecord {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            parts: vec![Part { text: message.text }],
        }
    }
}

/// A client that turns a conversation into the next model reply.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the system instruction and the full ordered conversation, return the reply text.
    ///
    /// `messages` must end with the new user message and can't be empty.
    async fn complete(
        &self,
        system_instruction: &str,
        messages: &[Message],
    ) -> Result<String, GlossaError>;

    /// Model identifier, for display.
    fn model(&self) -> &str;
}
