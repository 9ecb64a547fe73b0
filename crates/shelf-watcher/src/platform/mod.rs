//! Platform-specific raw signal sources

pub mod emitter;
pub mod lines;

#[cfg(unix)]
pub mod unix;

use crate::source::SignalSource;
use std::sync::Arc;

pub use emitter::EventEmitter;
pub use lines::LineSource;

/// The device signal source for the current platform
///
/// On unix this is `SIGUSR1`; elsewhere the returned source reports
/// itself unavailable when a listener is added.
pub fn default_source() -> Arc<dyn SignalSource> {
    #[cfg(unix)]
    {
        Arc::new(unix::UnixSignalSource::usr1())
    }

    #[cfg(not(unix))]
    {
        Arc::new(EventEmitter::unavailable(
            "device-signal",
            "POSIX signals are not supported on this platform",
        ))
    }
}
