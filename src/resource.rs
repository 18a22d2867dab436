//! Request-coalescing cache for asynchronously loaded resources.
//!
//! Each key has at most one in-flight load: the first request spawns a
//! loader thread and installs a pending marker, later requests for the
//! same key attach to that marker instead of issuing a duplicate. Results
//! are memoized for the cache's lifetime; a failed load is terminal for
//! its key and is never retried.

use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::{Arc, mpsc},
    thread,
};

use tracing::warn;

/// Poll-style view of one resource slot.
#[derive(Clone, Debug)]
pub enum ResourceState<T: ?Sized> {
    /// Load is in flight; ask again on a later frame.
    Pending,
    Ready(Arc<T>),
    /// Load failed (already logged); terminal for this key.
    Failed,
}

impl<T: ?Sized> ResourceState<T> {
    pub fn ready(&self) -> Option<Arc<T>> {
        match self {
            ResourceState::Ready(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ResourceState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ResourceState::Failed)
    }
}

enum Slot<T: ?Sized> {
    Pending(mpsc::Receiver<anyhow::Result<Arc<T>>>),
    Ready(Arc<T>),
    Failed,
}

pub struct ResourceCache<K, T: ?Sized> {
    slots: HashMap<K, Slot<T>>,
}

impl<K, T> Default for ResourceCache<K, T>
where
    K: Eq + Hash,
    T: ?Sized,
{
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K, T> ResourceCache<K, T>
where
    K: Eq + Hash + Clone + Debug,
    T: ?Sized + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll the slot for `key`, spawning `load` on a new thread if this is
    /// the first request. Never blocks on the loader.
    pub fn get_or_spawn<F>(&mut self, key: K, load: F) -> ResourceState<T>
    where
        F: FnOnce() -> anyhow::Result<Arc<T>> + Send + 'static,
    {
        if !self.slots.contains_key(&key) {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                // A dropped receiver just means the cache went away.
                let _ = tx.send(load());
            });
            self.slots.insert(key.clone(), Slot::Pending(rx));
        }

        let slot = self
            .slots
            .get_mut(&key)
            .expect("slot inserted or present above");

        if let Slot::Pending(rx) = slot {
            match rx.try_recv() {
                Ok(Ok(value)) => *slot = Slot::Ready(value),
                Ok(Err(err)) => {
                    warn!(?key, error = %err, "resource load failed");
                    *slot = Slot::Failed;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => {
                    warn!(?key, "resource loader thread vanished without a result");
                    *slot = Slot::Failed;
                }
            }
        }

        match slot {
            Slot::Pending(_) => ResourceState::Pending,
            Slot::Ready(value) => ResourceState::Ready(Arc::clone(value)),
            Slot::Failed => ResourceState::Failed,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
