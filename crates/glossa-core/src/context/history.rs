use crate::llm::Message;
use serde::{Deserialize, Serialize};

/// Ordered, append-only list of messages exchanged with the model.
///
/// The whole list is replayed as context on every request, so order matters.
/// It only grows by whole turns: a user message followed by the model's reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finished turn.
    pub fn push_turn(&mut self, user: Message, reply: Message) {
        self.messages.push(user);
        self.messages.push(reply);
    }

    /// The request context for a new user message: everything so far plus that message.
    pub fn with_pending(&self, user: &Message) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(user.clone());
        messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed turns.
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_push_turn_keeps_order() {
        let mut conv = Conversation::new();
        conv.push_turn(Message::user("one"), Message::model("1"));
        conv.push_turn(Message::user("two"), Message::model("2"));

        let texts: Vec<&str> = conv.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["one", "1", "two", "2"]);
        assert_eq!(conv.turns(), 2);
        assert_eq!(conv.messages()[3].role(), Role::Model);
    }

    #[test]
    fn test_with_pending_does_not_mutate() {
        let mut conv = Conversation::new();
        conv.push_turn(Message::user("hi"), Message::model("hello"));

        let context = conv.with_pending(&Message::user("again"));
        assert_eq!(context.len(), 3);
        assert_eq!(context[2], Message::user("again"));
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let mut conv = Conversation::new();
        conv.push_turn(Message::user("你好"), Message::model("Hello"));

        let value = serde_json::to_value(&conv).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"role": "user", "parts": [{"text": "你好"}]},
                {"role": "model", "parts": [{"text": "Hello"}]}
            ])
        );
    }

    #[test]
    fn test_rejects_record_without_parts() {
        let result: Result<Conversation, _> =
            serde_json::from_str(r#"[{"role": "user", "parts": []}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_role() {
        let result: Result<Conversation, _> =
            serde_json::from_str(r#"[{"role": "system", "parts": [{"text": "x"}]}]"#);
        assert!(result.is_err());
    }
}
