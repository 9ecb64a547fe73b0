//! POSIX signal source
//!
//! Each delivery of the configured signal counts as one raw event, so
//! `kill -USR1 <pid>` stands in for a device shake. Installing the
//! handler replaces the signal's default disposition for the rest of the
//! process lifetime.

use crate::source::{Listener, ListenerRegistration, SignalSource};
use shelf_core::DebounceError;
use tokio::runtime::Handle;
use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Signal source backed by a unix signal
pub struct UnixSignalSource {
    name: String,
    kind: SignalKind,
}

impl UnixSignalSource {
    pub fn new(name: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// `SIGUSR1`
    pub fn usr1() -> Self {
        Self::new("SIGUSR1", SignalKind::user_defined1())
    }

    /// `SIGUSR2`
    pub fn usr2() -> Self {
        Self::new("SIGUSR2", SignalKind::user_defined2())
    }
}

impl SignalSource for UnixSignalSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_listener(&self, listener: Listener) -> Result<ListenerRegistration, DebounceError> {
        let handle = Handle::try_current()
            .map_err(|_| DebounceError::unavailable(&self.name, "no tokio runtime to receive signals"))?;
        let _guard = handle.enter();

        let mut stream = signal(self.kind)
            .map_err(|e| DebounceError::unavailable(&self.name, e.to_string()))?;

        let name = self.name.clone();
        let task = handle.spawn(async move {
            while stream.recv().await.is_some() {
                listener();
            }
            debug!(source = %name, "Signal stream closed");
        });

        Ok(ListenerRegistration::new(move || task.abort()))
    }
}
