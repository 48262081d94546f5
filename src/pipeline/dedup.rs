// src/pipeline/dedup.rs - shared set of entity ids already seen this run
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Guarantees at-most-once downstream processing per entity id. Shared by
/// all workers; check-and-insert is atomic under the lock.
#[derive(Debug, Clone, Default)]
pub struct DedupRegistry {
    seen: Arc<Mutex<HashSet<String>>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time an id is seen; repeats are dropped
    /// silently by the caller.
    pub fn admit(&self, id: &str) -> bool {
        self.seen.lock().unwrap().insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
