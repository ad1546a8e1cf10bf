/// In-memory session store
///
/// Process-lifetime key/value flags for flow continuation. Nothing persists
/// across a restart, which is the point: a stale capture flag must not
/// outlive the app that set it.
use crate::ports::session::SessionStorePort;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorePort for InMemorySessionStore {
    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn take(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().remove(key)
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}
