//! Snapshot observers.

use crate::TextSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverMode {
    /// Removed after its first notification.
    Once,
    Persistent,
}

struct Entry {
    id: ObserverId,
    mode: ObserverMode,
    observer: Box<dyn FnMut(&TextSelection)>,
}

/// Observers notified whenever the published snapshot changes.
#[derive(Default)]
pub struct ObserverSet {
    entries: Vec<Entry>,
    next: u64,
}

impl ObserverSet {
    pub fn add(&mut self, mode: ObserverMode, observer: impl FnMut(&TextSelection) + 'static) -> ObserverId {
        self.next += 1;
        let id = ObserverId(self.next);
        self.entries.push(Entry {
            id,
            mode,
            observer: Box::new(observer),
        });
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, snapshot: &TextSelection) {
        self.entries.retain_mut(|entry| {
            (entry.observer)(snapshot);
            entry.mode == ObserverMode::Persistent
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.entries.len())
            .finish()
    }
}
