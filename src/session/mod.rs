//! Bearer token persistence.
//!
//! Holds zero or one token. Every accessor reads the backend at call time so
//! a logout or login from another handle is seen by the next request.

use crate::storage::{KeyValueStore, SESSION_TOKEN_KEY};
use std::sync::Arc;
use tracing::warn;

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `token`, replacing any previous one.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.store.set(SESSION_TOKEN_KEY, token.trim()) {
            warn!("failed to persist session token: {:#}", e);
        }
    }

    pub fn clear_token(&self) {
        if let Err(e) = self.store.remove(SESSION_TOKEN_KEY) {
            warn!("failed to clear session token: {:#}", e);
        }
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    /// The stored token, or `None` when absent, blank, or unreadable.
    pub fn current_token(&self) -> Option<String> {
        match self.store.get(SESSION_TOKEN_KEY) {
            Ok(Some(token)) => {
                let token = token.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Ok(None) => None,
            Err(e) => {
                warn!("failed to read session token: {:#}", e);
                None
            }
        }
    }
}
