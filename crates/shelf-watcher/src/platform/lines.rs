//! Line-oriented signal source
//!
//! Reads lines on a background thread. Every character of a non-empty
//! line is one raw event, so typing `sss` produces a three-event burst.

use crate::source::{Listener, ListenerRegistration, SignalSource};
use parking_lot::Mutex;
use shelf_core::DebounceError;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Signal source fed by a line reader
///
/// The reader is consumed by the first listener. Removal stops event
/// delivery immediately, but a thread blocked in `read` only exits once the
/// next line or EOF arrives.
pub struct LineSource {
    name: String,
    reader: Mutex<Option<Box<dyn BufRead + Send>>>,
}

impl LineSource {
    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Mutex::new(Some(Box::new(reader))),
        }
    }

    pub fn stdin() -> Self {
        Self::from_reader("stdin", BufReader::new(io::stdin()))
    }
}

impl SignalSource for LineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_listener(&self, listener: Listener) -> Result<ListenerRegistration, DebounceError> {
        let reader = self
            .reader
            .lock()
            .take()
            .ok_or_else(|| DebounceError::unavailable(&self.name, "reader already consumed"))?;

        let stopped = Arc::new(AtomicBool::new(false));
        let thread_stopped = Arc::clone(&stopped);
        let name = self.name.clone();

        std::thread::Builder::new()
            .name(format!("shelf-{}", self.name))
            .spawn(move || read_lines(&name, reader, listener, &thread_stopped))
            .map_err(|e| DebounceError::unavailable(&self.name, e.to_string()))?;

        Ok(ListenerRegistration::new(move || {
            stopped.store(true, Ordering::SeqCst);
        }))
    }
}

fn read_lines(name: &str, reader: Box<dyn BufRead + Send>, listener: Listener, stopped: &AtomicBool) {
    for line in reader.lines() {
        if stopped.load(Ordering::SeqCst) {
            return;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(source = %name, "Failed to read line: {}", e);
                return;
            }
        };

        for _ in line.trim().chars() {
            if stopped.load(Ordering::SeqCst) {
                return;
            }
            listener();
        }
    }
    debug!(source = %name, "Line source reached EOF");
}
