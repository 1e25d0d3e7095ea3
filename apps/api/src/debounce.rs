//! Keyed trailing-edge debounce on top of tokio timers.
//!
//! Calling [`Debouncer::call`] for a key aborts any callback still pending for
//! that key and restarts the delay. Keys are independent of each other.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer<K> {
    delay: Duration,
    pending: Arc<Mutex<HashMap<K, JoinHandle<()>>>>,
}

impl<K> Clone for Debouncer<K> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay,
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `f` to run once `delay` has elapsed without another call for `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&self, key: K, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let mut pending = self.lock();
        if let Some(previous) = pending.remove(&key) {
            previous.abort();
        }
        pending.retain(|_, handle| !handle.is_finished());

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        pending.insert(key, handle);
    }

    /// Drops the pending callback for `key`, if any.
    pub fn cancel(&self, key: &K) {
        if let Some(handle) = self.lock().remove(key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&self) {
        for (_, handle) in self.lock().drain() {
            handle.abort();
        }
    }

    /// Number of callbacks that have not fired yet.
    pub fn pending(&self) -> usize {
        self.lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
