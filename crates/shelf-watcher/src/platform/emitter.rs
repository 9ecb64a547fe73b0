//! In-process event emitter
//!
//! Fans each `emit()` out to every registered listener. Used for signals
//! raised by the host application itself and for driving debouncers in
//! tests.

use crate::source::{Listener, ListenerRegistration, SignalSource};
use parking_lot::Mutex;
use shelf_core::DebounceError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

/// Signal source backed by explicit `emit()` calls
pub struct EventEmitter {
    name: String,
    /// Set when the emitter models an absent platform API
    unavailable: Option<String>,
    listeners: Arc<Mutex<Listeners>>,
}

impl EventEmitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unavailable: None,
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// An emitter whose `add_listener` always fails with `reason`
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::new(name)
        }
    }

    /// Raise one raw signal; returns the number of listeners notified
    pub fn emit(&self) -> usize {
        // Listeners run outside the lock so they may register or remove others
        let snapshot: Vec<Listener> = self.listeners.lock().entries.values().cloned().collect();
        trace!(source = %self.name, listeners = snapshot.len(), "Emitting raw signal");

        for listener in &snapshot {
            listener();
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

impl SignalSource for EventEmitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_listener(&self, listener: Listener) -> Result<ListenerRegistration, DebounceError> {
        if let Some(reason) = &self.unavailable {
            return Err(DebounceError::unavailable(&self.name, reason.clone()));
        }

        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, listener);
            id
        };

        let listeners = Arc::clone(&self.listeners);
        Ok(ListenerRegistration::new(move || {
            listeners.lock().entries.remove(&id);
        }))
    }
}
