//! Per-user flow sessions.
//!
//! The router takes a session out before a step and puts it back only when the flow continues,
//! so every terminal transition or error leaves nothing behind for that user.

use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::flows::FlowState;

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, FlowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the user's session.
    pub async fn take(&self, user_id: i64) -> Option<FlowState> {
        self.sessions.lock().await.remove(&user_id)
    }

    /// Stores the user's session, replacing any previous one.
    pub async fn put(&self, user_id: i64, state: FlowState) {
        self.sessions.lock().await.insert(user_id, state);
    }

    pub async fn clear(&self, user_id: i64) {
        self.sessions.lock().await.remove(&user_id);
    }

    /// Flow and state names for logs and tests.
    pub async fn describe(&self, user_id: i64) -> Option<(&'static str, &'static str)> {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .map(|s| (s.flow_name(), s.state_name()))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
