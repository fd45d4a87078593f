use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use wotrack_core::session::SessionStore;

/// Most sessions kept at once; creating one more evicts the least recently
/// used.
pub const MAX_SESSIONS: usize = 1024;

struct Session {
    store: SessionStore,
    last_used: u64,
}

/// Live sessions keyed by id, bounded by a capacity.
pub struct Sessions {
    map: HashMap<String, Session>,
    capacity: usize,
    clock: u64,
}

impl Sessions {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Start a session under `id`, evicting the least recently used one when
    /// full.
    pub fn insert(&mut self, id: String) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&id) {
            let oldest = self
                .map
                .iter()
                .min_by_key(|(_, s)| s.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                self.map.remove(&oldest);
                tracing::debug!(session = %oldest, "evicted idle session");
            }
        }
        let last_used = self.tick();
        self.map.insert(
            id,
            Session {
                store: SessionStore::new(),
                last_used,
            },
        );
    }

    /// The session's values, marking it as just used.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SessionStore> {
        let now = self.tick();
        self.map.get_mut(id).map(|s| {
            s.last_used = now;
            &mut s.store
        })
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.map.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub sessions: Arc<Mutex<Sessions>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            sessions: Arc::new(Mutex::new(Sessions::with_capacity(MAX_SESSIONS))),
        }
    }
}
