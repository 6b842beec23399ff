use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned when a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener list for one event source
///
/// Dispatch works on a snapshot, so a listener may unregister itself (or any
/// other listener) while an event is being delivered.
pub struct ListenerRegistry<L> {
    entries: Mutex<Vec<(ListenerId, L)>>,
}

impl<L: Clone> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, listener: L) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    /// Returns false when the id was not (or no longer) registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn snapshot(&self) -> Vec<L> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: Clone> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
