//! Persistent chat transcript.
//!
//! Every append rewrites the whole message list, which keeps the stored
//! form identical to what a fresh load produces. The context window sent
//! with each chat turn is the newest [`CONTEXT_WINDOW`] entries, including
//! the user message being answered.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::{ContextMessage, Role};
use crate::store::{CacheStore, StoreError, KEY_MESSAGES};

/// How many transcript entries ride along with a chat request.
pub const CONTEXT_WINDOW: usize = 10;

/// One transcript entry. `timestamp` is a preformatted wall-clock label,
/// kept as text so old entries render exactly as they were recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_output: Option<Value>,
    pub timestamp: String,
}

pub struct ChatHistory {
    store: CacheStore,
    messages: Vec<StoredMessage>,
}

impl ChatHistory {
    /// Load the stored transcript; a missing or unreadable record starts
    /// an empty one.
    pub fn load(store: CacheStore) -> Result<ChatHistory, StoreError> {
        let messages = store.get(KEY_MESSAGES)?.unwrap_or_default();
        Ok(ChatHistory { store, messages })
    }

    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, content: &str) -> Result<(), StoreError> {
        self.push(Role::User, content, None)
    }

    pub fn push_assistant(
        &mut self,
        content: &str,
        mcp_output: Option<Value>,
    ) -> Result<(), StoreError> {
        self.push(Role::Assistant, content, mcp_output)
    }

    fn push(
        &mut self,
        role: Role,
        content: &str,
        mcp_output: Option<Value>,
    ) -> Result<(), StoreError> {
        self.messages.push(StoredMessage {
            role,
            content: content.to_string(),
            mcp_output,
            timestamp: chrono::Local::now().format("%H:%M").to_string(),
        });
        self.persist()
    }

    /// The newest entries in request form, oldest first.
    pub fn context_window(&self) -> Vec<ContextMessage> {
        let skip = self.messages.len().saturating_sub(CONTEXT_WINDOW);
        self.messages[skip..]
            .iter()
            .map(|m| ContextMessage {
                role: m.role,
                message: m.content.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.messages.clear();
        self.store.remove(KEY_MESSAGES)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.put(KEY_MESSAGES, &self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> CacheStore {
        CacheStore::open(dir.path().join("cache")).unwrap()
    }

    #[test]
    fn transcript_survives_a_reload() {
        let dir = tempdir().unwrap();
        {
            let store = open_store(&dir);
            let mut history = ChatHistory::load(store).unwrap();
            history.push_user("are you hungry?").unwrap();
            history
                .push_assistant("a little!", Some(json!({"tool": "feed"})))
                .unwrap();
        }
        let history = ChatHistory::load(open_store(&dir)).unwrap();
        assert_eq!(history.messages().len(), 2);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(history.messages()[0].content, "are you hungry?");
        assert_eq!(
            history.messages()[1].mcp_output,
            Some(json!({"tool": "feed"}))
        );
    }

    #[test]
    fn context_window_keeps_the_newest_ten() {
        let dir = tempdir().unwrap();
        let mut history = ChatHistory::load(open_store(&dir)).unwrap();
        for i in 0..6 {
            history.push_user(&format!("question {i}")).unwrap();
            history.push_assistant(&format!("answer {i}"), None).unwrap();
        }

        let window = history.context_window();
        assert_eq!(window.len(), CONTEXT_WINDOW);
        assert_eq!(window[0].message, "question 1");
        assert_eq!(window[9].message, "answer 5");
    }

    #[test]
    fn context_window_includes_the_message_being_answered() {
        let dir = tempdir().unwrap();
        let mut history = ChatHistory::load(open_store(&dir)).unwrap();
        history.push_user("hello there").unwrap();

        let window = history.context_window();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window[0].message, "hello there");
    }

    #[test]
    fn clear_empties_memory_and_store() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut history = ChatHistory::load(store.clone()).unwrap();
        history.push_user("forget this").unwrap();
        history.clear().unwrap();

        assert!(history.messages().is_empty());
        let reloaded = ChatHistory::load(store).unwrap();
        assert!(reloaded.messages().is_empty());
    }

    #[test]
    fn unreadable_transcript_starts_empty() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        store.put(KEY_MESSAGES, &42).unwrap();

        let history = ChatHistory::load(store).unwrap();
        assert!(history.messages().is_empty());
    }
}
