//! Keyed observable store shared by dashboard consumers.
//!
//! DESIGN
//! ======
//! One store instance owns a `key -> snapshot` mapping and an ordered list of
//! listeners. Producers (usually a network loader) publish whole snapshots per
//! key; consumers read the current mapping once when they attach and then
//! subscribe for later changes. The store never replays state on subscribe.
//!
//! The mapping lives behind an `Arc` that is swapped (copy-on-write) on every
//! accepted publish, so `get_state` hands out a cheap immutable view that is
//! never mutated after the fact and never stale for a caller that reads after
//! a publish returns.
//!
//! Listeners run after the internal lock is released. A listener may call
//! back into the store (`get_state`, `subscribe`, disposing handles) without
//! deadlocking.
//!
//! EQUALITY
//! ========
//! Redundant publishes are suppressed with an explicit equality rule chosen at
//! construction. [`KeyedObservableStore::new`] uses value equality
//! (`PartialEq`); [`KeyedObservableStore::with_equality`] accepts any rule,
//! e.g. `Arc::ptr_eq` when snapshots are shared references and identity is
//! what matters.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Full mapping handed to listeners and returned by [`KeyedObservableStore::get_state`].
pub type StateMap<S> = HashMap<String, S>;

/// Shared "same snapshot" rule; see [`KeyedObservableStore::equality`].
pub type Equality<S> = Arc<dyn Fn(&S, &S) -> bool + Send + Sync>;
type ListenerFn<S> = Box<dyn Fn(&StateMap<S>) + Send + Sync>;

struct ListenerEntry<S> {
    id: u64,
    active: AtomicBool,
    callback: ListenerFn<S>,
}

struct Inner<S> {
    items: Arc<StateMap<S>>,
    /// Registration order is notification order.
    listeners: Vec<Arc<ListenerEntry<S>>>,
    next_listener_id: u64,
}

fn lock<S>(inner: &Mutex<Inner<S>>) -> MutexGuard<'_, Inner<S>> {
    // Listeners never run under the lock, so poisoning can only come from a
    // panic inside the store itself; the mapping is still consistent then.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// STORE
// =============================================================================

/// A mapping from string keys to snapshots with change notification.
///
/// Cloning the store clones the handle; all clones share one mapping and one
/// listener list.
pub struct KeyedObservableStore<S> {
    inner: Arc<Mutex<Inner<S>>>,
    equality: Equality<S>,
}

impl<S> Clone for KeyedObservableStore<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), equality: Arc::clone(&self.equality) }
    }
}

impl<S> fmt::Debug for KeyedObservableStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("KeyedObservableStore")
            .field("len", &inner.items.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<S> KeyedObservableStore<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an empty store that compares snapshots by value.
    #[must_use]
    pub fn new() -> Self {
        Self::with_equality(|a: &S, b: &S| a == b)
    }
}

impl<S> Default for KeyedObservableStore<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> KeyedObservableStore<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create an empty store with a custom "same snapshot" rule.
    ///
    /// A publish whose snapshot is the same as the stored one under `equality`
    /// is a no-op.
    #[must_use]
    pub fn with_equality<F>(equality: F) -> Self
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items: Arc::new(HashMap::new()),
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
            equality: Arc::new(equality),
        }
    }

    /// Current full mapping. Empty until something has been published.
    #[must_use]
    pub fn get_state(&self) -> Arc<StateMap<S>> {
        Arc::clone(&lock(&self.inner).items)
    }

    /// Current snapshot for one key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<S> {
        lock(&self.inner).items.get(key).cloned()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        lock(&self.inner).items.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).items.is_empty()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// Apply this store's equality rule. Consumers use it to filter
    /// notifications the same way the store filters publishes.
    #[must_use]
    pub fn is_same(&self, a: &S, b: &S) -> bool {
        (self.equality)(a, b)
    }

    /// Handle to this store's equality rule, for consumers that compare
    /// inside a listener without holding the store itself.
    #[must_use]
    pub fn equality(&self) -> Equality<S> {
        Arc::clone(&self.equality)
    }

    /// Register `listener` for future changes.
    ///
    /// The listener is not called with the current state; read
    /// [`get_state`](Self::get_state) for that. The returned handle removes
    /// the listener when disposed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateMap<S>) + Send + Sync + 'static,
    {
        let entry = {
            let mut inner = lock(&self.inner);
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            let entry = Arc::new(ListenerEntry {
                id,
                active: AtomicBool::new(true),
                callback: Box::new(listener),
            });
            inner.listeners.push(Arc::clone(&entry));
            let listeners = inner.listeners.len();
            tracing::trace!(listener_id = id, listeners, "store listener subscribed");
            entry
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription {
            disposer: Some(Box::new(move || {
                entry.active.store(false, Ordering::Release);
                if let Some(inner) = weak.upgrade() {
                    let mut inner = lock(&inner);
                    inner.listeners.retain(|e| e.id != entry.id);
                    let listeners = inner.listeners.len();
                    tracing::trace!(listener_id = entry.id, listeners, "store listener disposed");
                }
            })),
        }
    }

    /// Replace the snapshot stored under `key`.
    ///
    /// Returns `false` without touching the mapping or notifying anyone when
    /// the stored snapshot is the same as `snapshot`. Otherwise every live
    /// listener is called once, in registration order, with the full mapping.
    pub fn publish_update(&self, key: impl Into<String>, snapshot: S) -> bool {
        let key = key.into();
        let (state, listeners) = {
            let mut inner = lock(&self.inner);
            if inner.items.get(&key).is_some_and(|existing| (self.equality)(existing, &snapshot)) {
                tracing::trace!(%key, "store publish unchanged; skipping notify");
                return false;
            }
            Arc::make_mut(&mut inner.items).insert(key.clone(), snapshot);
            tracing::debug!(%key, listeners = inner.listeners.len(), "store entry updated");
            (Arc::clone(&inner.items), inner.listeners.clone())
        };

        notify(&state, &listeners);
        true
    }

    /// Publish several snapshots as one transition.
    ///
    /// Each entry follows the [`publish_update`](Self::publish_update) no-op
    /// rule. Listeners are notified once after the batch, and only when at
    /// least one entry changed. Returns the number of distinct keys changed;
    /// a key that appears twice in the batch counts once.
    pub fn publish_many<I, K>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
    {
        let (changed, state, listeners) = {
            let mut inner = lock(&self.inner);
            let mut touched = HashSet::new();
            for (key, snapshot) in entries {
                let key = key.into();
                let unchanged = inner
                    .items
                    .get(&key)
                    .is_some_and(|existing| (self.equality)(existing, &snapshot));
                if unchanged {
                    continue;
                }
                Arc::make_mut(&mut inner.items).insert(key.clone(), snapshot);
                touched.insert(key);
            }
            let changed = touched.len();
            if changed == 0 {
                tracing::trace!("store batch unchanged; skipping notify");
                return 0;
            }
            tracing::debug!(changed, listeners = inner.listeners.len(), "store batch applied");
            (changed, Arc::clone(&inner.items), inner.listeners.clone())
        };

        notify(&state, &listeners);
        changed
    }

    /// Drop every entry. Listeners stay registered and are notified once if
    /// the mapping was non-empty.
    pub fn reset(&self) -> bool {
        let (state, listeners) = {
            let mut inner = lock(&self.inner);
            if inner.items.is_empty() {
                return false;
            }
            inner.items = Arc::new(HashMap::new());
            tracing::debug!(listeners = inner.listeners.len(), "store reset");
            (Arc::clone(&inner.items), inner.listeners.clone())
        };

        notify(&state, &listeners);
        true
    }
}

fn notify<S>(state: &StateMap<S>, listeners: &[Arc<ListenerEntry<S>>]) {
    for entry in listeners {
        // Re-checked per call: an earlier listener in this round may have
        // disposed a later one.
        if entry.active.load(Ordering::Acquire) {
            (entry.callback)(state);
        }
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Owned registration returned by [`KeyedObservableStore::subscribe`].
///
/// Disposing is idempotent. Dropping a handle that was never disposed
/// disposes it. Disposing after the store itself is gone is a no-op.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
