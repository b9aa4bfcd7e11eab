pub mod error;
pub mod llm;
pub mod context;
pub mod config;
pub mod constants;
pub mod session;

// Re-export key types
pub use error::{GlossaError, Result};
pub use llm::{CompletionClient, GeminiClient, Message, Role};
pub use context::{Conversation, ConversationStore};
pub use config::Settings;
pub use session::{ChatSession, TurnEvent, TurnRecord};
