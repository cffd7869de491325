//! Listener registry backing change notification
//!
//! Subscriptions are identified by a counter so an unsubscribe only
//! removes its own callback. Listeners are invoked synchronously on the
//! thread that performed the store mutation.

use hydro_core::storage::{ChangeEvent, Subscription};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Listener<K> = Box<dyn Fn(K, ChangeEvent) + Send + Sync>;

/// A set of change listeners keyed by subscription id
pub struct Listeners<K> {
    entries: Arc<RwLock<HashMap<u64, Listener<K>>>>,
    next_id: AtomicU64,
}

impl<K> Default for Listeners<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K: Copy + Send + 'static> Listeners<K> {
    /// Register a listener, returning its subscription handle
    pub fn subscribe(&self, listener: Listener<K>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(id, listener);

        let entries = self.entries.clone();
        Subscription::new(move || {
            entries.write().remove(&id);
        })
    }

    /// Invoke every registered listener
    pub fn notify(&self, key: K, event: ChangeEvent) {
        for listener in self.entries.read().values() {
            listener(key, event);
        }
    }

    /// Number of active listeners
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check whether any listener is registered
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_reaches_all_listeners() {
        let listeners: Listeners<u32> = Listeners::default();
        let count = Arc::new(AtomicUsize::new(0));

        let a = count.clone();
        let _sub_a = listeners.subscribe(Box::new(move |_, _| {
            a.fetch_add(1, Ordering::SeqCst);
        }));
        let b = count.clone();
        let _sub_b = listeners.subscribe(Box::new(move |_, _| {
            b.fetch_add(1, Ordering::SeqCst);
        }));

        listeners.notify(7, ChangeEvent::Added);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_removes_listener() {
        let listeners: Listeners<u32> = Listeners::default();
        {
            let _sub = listeners.subscribe(Box::new(|_, _| {}));
            assert_eq!(listeners.len(), 1);
        }
        assert!(listeners.is_empty());
    }
}
