//! Session synchronization service.
//!
//! One instance per app, created at start-up and shared via context. It owns
//! the subscriber list, so components that re-render do not register twice:
//! they subscribe on mount and unsubscribe on cleanup.

#[cfg(test)]
#[path = "session_sync_test.rs"]
mod session_sync_test;

use std::sync::{Arc, Mutex, PoisonError};

use super::session::SessionEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    started: bool,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

#[derive(Clone, Default)]
pub struct SessionSync {
    inner: Arc<Mutex<Inner>>,
}

impl SessionSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner)
    }

    /// Mark the service started. Only the first call returns `true`; the
    /// caller that gets `true` fetches the initial session.
    pub fn start(&self) -> bool {
        self.with(|inner| !std::mem::replace(&mut inner.started, true))
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.with(|inner| inner.started)
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + Send + Sync + 'static) -> SubscriptionId {
        self.with(|inner| {
            inner.next_id += 1;
            let id = SubscriptionId(inner.next_id);
            inner.listeners.push((id, Arc::new(listener)));
            id
        })
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.with(|inner| {
            let before = inner.listeners.len();
            inner.listeners.retain(|(sid, _)| *sid != id);
            inner.listeners.len() != before
        })
    }

    /// Deliver `event` to every current subscriber in subscription order.
    /// Listeners run outside the lock and may (un)subscribe.
    pub fn publish(&self, event: &SessionEvent) {
        let listeners: Vec<Listener> = self.with(|inner| inner.listeners.iter().map(|(_, l)| l.clone()).collect());
        for listener in listeners {
            listener(event);
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.with(|inner| inner.listeners.len())
    }
}
