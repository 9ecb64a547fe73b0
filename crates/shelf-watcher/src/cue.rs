//! Confirmation cues
//!
//! A cue tells the user a trigger was accepted (a short vibration on a
//! phone, a bell in a terminal). Cue failures are reported to the caller,
//! which logs them and carries on with the action.

use crossbeam_channel::{bounded, Sender, TrySendError};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Cue failures
#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue device unavailable: {0}")]
    Unavailable(String),

    #[error("cue output failed: {0}")]
    Io(#[from] io::Error),

    #[error("cue worker is busy")]
    Busy,

    #[error("cue worker has stopped")]
    WorkerStopped,
}

/// Something that alerts the user
pub trait Cue: Send + Sync {
    fn alert(&self) -> Result<(), CueError>;
}

/// Cue that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl Cue for SilentCue {
    fn alert(&self) -> Result<(), CueError> {
        Ok(())
    }
}

/// Terminal bell on stderr
#[derive(Debug, Clone)]
pub struct BellCue {
    pulses: u32,
    gap: Duration,
}

impl BellCue {
    /// `pulses` bells separated by `gap`
    pub fn new(pulses: u32, gap: Duration) -> Self {
        Self { pulses, gap }
    }
}

impl Default for BellCue {
    fn default() -> Self {
        Self::new(1, Duration::from_millis(100))
    }
}

impl Cue for BellCue {
    fn alert(&self) -> Result<(), CueError> {
        let mut stderr = io::stderr().lock();
        for i in 0..self.pulses {
            if i > 0 {
                std::thread::sleep(self.gap);
            }
            stderr.write_all(b"\x07")?;
            stderr.flush()?;
        }
        Ok(())
    }
}

/// Runs another cue on a dedicated worker thread
///
/// `alert` only enqueues, so a slow cue never delays the action. At most
/// `capacity` alerts may be pending; further alerts fail with
/// [`CueError::Busy`].
pub struct BackgroundCue {
    tx: Sender<()>,
}

impl BackgroundCue {
    pub fn spawn<C: Cue + 'static>(inner: C, capacity: usize) -> Result<Self, CueError> {
        let (tx, rx) = bounded::<()>(capacity.max(1));

        std::thread::Builder::new()
            .name("shelf-cue".to_string())
            .spawn(move || {
                // Exits once every sender is dropped
                for () in rx.iter() {
                    if let Err(e) = inner.alert() {
                        warn!("Background cue failed: {}", e);
                    }
                }
                debug!("Cue worker stopped");
            })?;

        Ok(Self { tx })
    }
}

impl Cue for BackgroundCue {
    fn alert(&self) -> Result<(), CueError> {
        self.tx.try_send(()).map_err(|e| match e {
            TrySendError::Full(()) => CueError::Busy,
            TrySendError::Disconnected(()) => CueError::WorkerStopped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    struct CountingCue(Arc<AtomicUsize>);

    impl Cue for CountingCue {
        fn alert(&self) -> Result<(), CueError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct SlowCue(Duration);

    impl Cue for SlowCue {
        fn alert(&self) -> Result<(), CueError> {
            std::thread::sleep(self.0);
            Ok(())
        }
    }

    #[test]
    fn test_background_cue_runs_inner() {
        let count = Arc::new(AtomicUsize::new(0));
        let cue = BackgroundCue::spawn(CountingCue(Arc::clone(&count)), 4).unwrap();

        cue.alert().unwrap();
        cue.alert().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_background_cue_does_not_block() {
        let cue = BackgroundCue::spawn(SlowCue(Duration::from_millis(500)), 1).unwrap();

        let start = Instant::now();
        let _ = cue.alert();
        let _ = cue.alert();
        let _ = cue.alert();
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[test]
    fn test_background_cue_reports_busy() {
        let cue = BackgroundCue::spawn(SlowCue(Duration::from_millis(500)), 1).unwrap();

        // One alert in flight, one queued, the rest overflow
        let results: Vec<_> = (0..4).map(|_| cue.alert()).collect();
        assert!(results.iter().any(|r| matches!(r, Err(CueError::Busy))));
    }

    #[test]
    fn test_silent_cue() {
        assert!(SilentCue.alert().is_ok());
    }
}
