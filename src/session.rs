use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session key under which the authenticated user is stored.
pub const USER_KEY: &str = "user";

/// Identity of the signed-in employee, as persisted in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    /// Account role, e.g. "Employee".
    #[serde(default, rename = "type")]
    pub role: Option<String>,
}

/// Key/value session persistence. Read-only from the controllers'
/// perspective; populated at login and cleared at logout.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-process session with an explicit lifecycle.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the authenticated user under the `user` key.
    pub fn log_in(&self, user: &SessionUser) {
        let encoded = serde_json::to_string(user).expect("session user serializes");
        self.values
            .lock()
            .expect("session lock")
            .insert(USER_KEY.to_string(), encoded);
    }

    pub fn log_out(&self) {
        self.values.lock().expect("session lock").clear();
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("session lock").get(key).cloned()
    }
}

/// Decode the current user from the session, if any.
pub fn current_user(session: &dyn SessionStore) -> Option<SessionUser> {
    let raw = session.get(USER_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "session user entry is not valid JSON");
            None
        }
    }
}
