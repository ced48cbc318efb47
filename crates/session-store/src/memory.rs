//! In-process session store

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::{Result, SessionStore, StoreFuture};

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with an access token.
    pub fn with_access_token(token: impl Into<String>) -> Self {
        let mut state = HashMap::new();
        state.insert(crate::KEY_ACCESS_TOKEN.to_string(), token.into());
        Self {
            state: Mutex::new(state),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move { self.state.lock().await.get(key).cloned() })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, Result<()>> {
        Box::pin(async move {
            self.state.lock().await.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<String>>> {
        Box::pin(async move { Ok(self.state.lock().await.remove(key)) })
    }
}
