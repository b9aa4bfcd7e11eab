use crate::context::Conversation;
use crate::error::GlossaError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persists a single conversation to one JSON file.
///
/// The file holds a bare array of `{"role", "parts": [{"text"}]}` records, pretty
/// printed with non-ASCII text written as-is. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved conversation.
    ///
    /// A missing, unreadable or malformed file yields an empty conversation.
    pub fn load(&self) -> Conversation {
        match self.try_load() {
            Ok(conversation) => {
                tracing::info!(
                    path = %self.path.display(),
                    messages = conversation.len(),
                    "loaded conversation history"
                );
                conversation
            }
            Err(GlossaError::Io(e)) if e.kind() == ErrorKind::NotFound => Conversation::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "ignoring unreadable conversation history: {e}"
                );
                Conversation::new()
            }
        }
    }

    fn try_load(&self) -> Result<Conversation, GlossaError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Rewrite the history file with the full conversation.
    pub fn save(&self, conversation: &Conversation) -> Result<(), GlossaError> {
        let contents = serde_json::to_string_pretty(conversation)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, contents)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(
            path = %self.path.display(),
            messages = conversation.len(),
            "saved conversation history"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;
    use tempfile::TempDir;

    #[test]
    fn test_tmp_path_is_sibling() {
        let store = ConversationStore::new("/some/dir/chat_history.json");
        assert_eq!(
            store.tmp_path(),
            PathBuf::from("/some/dir/chat_history.json.tmp")
        );
    }

    #[test]
    fn test_save_writes_non_ascii_literally() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path().join("chat_history.json"));

        let mut conv = Conversation::new();
        conv.push_turn(Message::user("你好"), Message::model("Hello"));
        store.save(&conv).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("你好"));
        assert!(!raw.contains("\\u"));
        // two-space indentation
        assert!(raw.contains("\n  {"));
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path().join("nested").join("h.json"));

        store.save(&Conversation::new()).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }
}
