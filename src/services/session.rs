//! Per-session conversation histories.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{ConversationHistory, DEFAULT_HISTORY_LIMIT};

/// Shared handle to one session's history. Holding the lock for a whole turn
/// keeps turns on the same session from interleaving.
pub type SessionHandle = Arc<Mutex<ConversationHistory>>;

/// Keeps an independently owned history per session id.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    history_limit: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SessionStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            history_limit,
        }
    }

    /// Handle for `id`, creating an empty history on first use.
    pub async fn session(&self, id: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ConversationHistory::new(self.history_limit))))
            .clone()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.lock().await.contains_key(id)
    }

    /// Forget a session. Returns false if it did not exist.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    /// Empty a session's history without removing the session.
    pub async fn clear(&self, id: &str) {
        let handle = self.sessions.lock().await.get(id).cloned();
        if let Some(handle) = handle {
            handle.lock().await.clear();
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::default();

        store.session("alice").await.lock().await.record_turn("q1", "a1");
        store.session("bob").await.lock().await.record_turn("q2", "a2");
        store.session("bob").await.lock().await.record_turn("q3", "a3");

        assert_eq!(store.len().await, 2);
        assert_eq!(store.session("alice").await.lock().await.len(), 2);
        assert_eq!(store.session("bob").await.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_same_id_shares_history() {
        let store = SessionStore::default();
        let first = store.session("s").await;
        let second = store.session("s").await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_clear_and_remove() {
        let store = SessionStore::new(4);
        store.session("s").await.lock().await.record_turn("q", "a");

        store.clear("s").await;
        assert!(store.contains("s").await);
        assert!(store.session("s").await.lock().await.is_empty());

        assert!(store.remove("s").await);
        assert!(!store.remove("s").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_history_limit_applies_per_session() {
        let store = SessionStore::new(4);
        let handle = store.session("s").await;
        for i in 0..5 {
            handle.lock().await.record_turn(format!("q{i}"), format!("a{i}"));
        }
        assert_eq!(handle.lock().await.len(), 4);
    }
}
