use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key under which the search box value is kept between interactions.
pub const SEARCH_KEY: &str = "search";

/// Per-session UI values (the search box, mostly) that outlive a single
/// interaction. Lookup and reconciliation never read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Reset one key. Returns the previous value.
    pub fn clear(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}
