//! In-flight request tracking and aggregate loading state.
//!
//! Each pipeline instance owns one [`ActivityTracker`]; there is no global
//! state, so independent pipelines (as in tests) do not observe each other.
//! The derived loading flag is `in_flight > 0`, and listeners are notified
//! exactly once per boolean transition.

use std::sync::{Arc, Mutex};

/// Observer of the derived loading flag.
pub trait LoadingListener: Send + Sync {
    /// Called once per transition of the aggregate "is anything loading"
    /// boolean, never while the derived value is unchanged.
    fn on_loading_changed(&self, loading: bool);
}

struct TrackerState {
    in_flight: usize,
    listeners: Vec<Arc<dyn LoadingListener>>,
}

/// Shared in-flight counter with transition notifications.
#[derive(Clone)]
pub struct ActivityTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                in_flight: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Begin tracking one request. The returned guard decrements on drop, so
    /// a request aborted before dispatch still releases its slot.
    pub fn begin(&self) -> ActivityGuard {
        let notify = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.in_flight += 1;
            (state.in_flight == 1).then(|| state.listeners.clone())
        };
        if let Some(listeners) = notify {
            for listener in &listeners {
                listener.on_loading_changed(true);
            }
        }
        ActivityGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Number of requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .in_flight
    }

    /// Derived loading flag: `in_flight > 0`.
    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    /// Register a listener. Registrations are not de-duplicated; listeners
    /// run in registration order.
    pub fn subscribe(&self, listener: Arc<dyn LoadingListener>) {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .listeners
            .push(listener);
    }

    /// Remove a listener by pointer identity.
    pub fn unsubscribe(&self, listener: &Arc<dyn LoadingListener>) {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .listeners
            .retain(|existing| !Arc::ptr_eq(existing, listener));
    }
}

/// RAII guard for one in-flight request.
pub struct ActivityGuard {
    state: Arc<Mutex<TrackerState>>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        let notify = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.in_flight = state.in_flight.saturating_sub(1);
            (state.in_flight == 0).then(|| state.listeners.clone())
        };
        if let Some(listeners) = notify {
            for listener in &listeners {
                listener.on_loading_changed(false);
            }
        }
    }
}
