use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a session is in its conversation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// No thread yet; the next message founds one
    NoThread,
    /// Messages continue the stored thread
    HasThread,
}

/// Per-session conversation state.
///
/// Passed into and returned from each turn instead of being mutated in
/// place. Holds at most one thread id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thread_started_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session bound to `thread_id`, stamped now.
    pub fn with_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            thread_started_at: Some(Utc::now()),
        }
    }

    /// Stored thread id, if it is usable. Blank ids read as absent.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn thread_started_at(&self) -> Option<DateTime<Utc>> {
        self.thread_started_at
    }

    pub fn phase(&self) -> ConversationPhase {
        match self.thread_id() {
            Some(_) => ConversationPhase::HasThread,
            None => ConversationPhase::NoThread,
        }
    }

    pub fn has_thread(&self) -> bool {
        self.phase() == ConversationPhase::HasThread
    }

    /// Forget the thread; the next message starts a new conversation.
    pub fn reset(&mut self) {
        self.thread_id = None;
        self.thread_started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_thread() {
        let state = SessionState::new();
        assert_eq!(state.phase(), ConversationPhase::NoThread);
        assert_eq!(state.thread_id(), None);
    }

    #[test]
    fn test_with_thread() {
        let state = SessionState::with_thread("thread_abc");
        assert_eq!(state.phase(), ConversationPhase::HasThread);
        assert_eq!(state.thread_id(), Some("thread_abc"));
        assert!(state.thread_started_at().is_some());
    }

    #[test]
    fn test_blank_thread_id_reads_as_no_thread() {
        let state: SessionState = serde_json::from_str(r#"{"thread_id": "   "}"#).unwrap();
        assert_eq!(state.phase(), ConversationPhase::NoThread);
    }

    #[test]
    fn test_reset() {
        let mut state = SessionState::with_thread("thread_abc");
        state.reset();
        assert!(!state.has_thread());
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SessionState::new());
    }
}
