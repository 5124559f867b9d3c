use std::collections::HashSet;
use uuid::Uuid;

/// Server-assigned identity of one live transport session. Never reused.
pub type ConnectionId = Uuid;

/// Live connections and their count. Callers broadcast the new count after
/// every change.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    live: HashSet<ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ConnectionId) -> usize {
        self.live.insert(id);
        self.live.len()
    }

    /// Unknown ids leave the count untouched.
    pub fn unregister(&mut self, id: ConnectionId) -> usize {
        self.live.remove(&id);
        self.live.len()
    }

    pub fn count(&self) -> usize {
        self.live.len()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.live.contains(&id)
    }
}
