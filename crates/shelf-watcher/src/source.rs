//! Raw signal source seam
//!
//! A source exposes `add_listener(callback) -> registration`; the
//! registration removes the listener exactly once, either explicitly or
//! when dropped.

use shelf_core::DebounceError;
use std::fmt;
use std::sync::Arc;

/// Callback invoked once per raw signal occurrence
///
/// May be called from any thread.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// A device signal that can be listened to
pub trait SignalSource: Send + Sync {
    /// Human-readable source name, used in logs and errors
    fn name(&self) -> &str;

    /// Register a listener
    ///
    /// Fails with [`DebounceError::SourceUnavailable`] when the underlying
    /// platform API is absent.
    fn add_listener(&self, listener: Listener) -> Result<ListenerRegistration, DebounceError>;
}

/// Live listener registration
///
/// Removal runs at most once; dropping an active registration removes it.
pub struct ListenerRegistration {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    /// Wrap the source-specific removal routine
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// Deregister the listener (idempotent)
    pub fn remove(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    pub fn is_active(&self) -> bool {
        self.remove.is_some()
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.is_active())
            .finish()
    }
}
