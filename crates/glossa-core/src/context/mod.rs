mod history;
pub mod persistence;

pub use history::Conversation;
pub use persistence::ConversationStore;
