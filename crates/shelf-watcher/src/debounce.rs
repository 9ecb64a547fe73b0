//! Settle-then-cooldown debouncing of raw device signals
//!
//! A physical shake fires several raw events in quick succession. Each raw
//! event re-arms a short settle timer; only when the timer expires with no
//! further events is the burst treated as one logical trigger. The trigger
//! is then accepted if no other trigger was accepted within the cooldown
//! window, and dropped silently otherwise.
//!
//! ```text
//!   raw:     x  x x            x                     x
//!   settle:  [--[-[----]       [----]                [----]
//!                      ^accept      ^drop (cooldown)      ^accept
//! ```
//!
//! Every subscription owns one tokio task. Raw events reach it over an
//! unbounded channel, so the listener never blocks, and the task is the
//! only owner of [`DebounceState`].

use crate::cue::{Cue, SilentCue};
use crate::source::{Listener, ListenerRegistration, SignalSource};
use shelf_core::{DebounceConfig, DebounceError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, debug_span, trace, warn, Instrument, Span};
use ulid::Ulid;

/// One raw signal occurrence, stamped on arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignalEvent {
    pub at: Instant,
}

/// Outcome of a settled burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Trigger accepted; the action runs
    Accepted,
    /// Within the cooldown window of the previous acceptance
    Dropped { elapsed: Duration },
}

/// Per-subscription debounce state
#[derive(Debug, Default)]
pub struct DebounceState {
    last_accepted_at: Option<Instant>,
}

impl DebounceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    /// Decide on a burst that settled at `now`
    ///
    /// Accepting records `now`; dropping leaves the state untouched.
    pub fn evaluate(&mut self, now: Instant, cooldown: Duration) -> Decision {
        if let Some(last) = self.last_accepted_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < cooldown {
                return Decision::Dropped { elapsed };
            }
        }
        self.last_accepted_at = Some(now);
        Decision::Accepted
    }
}

/// Debounced dispatcher from a raw signal source to one action
///
/// At most one subscription is live at a time; `start` again only after
/// the previous [`SubscriptionHandle`] was stopped or dropped.
pub struct SignalDebouncer {
    source: Arc<dyn SignalSource>,
    config: DebounceConfig,
    cue: Arc<dyn Cue>,
    span: Span,
    started: Arc<AtomicBool>,
}

impl SignalDebouncer {
    pub fn new(source: Arc<dyn SignalSource>, config: DebounceConfig) -> Self {
        Self {
            source,
            config,
            cue: Arc::new(SilentCue),
            span: Span::none(),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cue emitted on every accepted trigger, before the action
    pub fn with_cue(mut self, cue: Arc<dyn Cue>) -> Self {
        self.cue = cue;
        self
    }

    /// Parent span for the debounce task's log events
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Whether a subscription handle is held
    ///
    /// Stays true after the source closes until the handle is stopped or
    /// dropped; use [`SubscriptionHandle::is_active`] for task liveness.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Subscribe to the raw source and dispatch `on_signal` per accepted trigger
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, on_signal: F) -> Result<SubscriptionHandle, DebounceError>
    where
        F: FnMut() + Send + 'static,
    {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(source = %self.source.name(), "start called while a subscription is live");
            return Err(DebounceError::AlreadyStarted);
        }

        match self.subscribe(on_signal) {
            Ok(handle) => Ok(handle),
            Err(e) => {
                self.started.store(false, Ordering::Release);
                warn!(source = %self.source.name(), "Failed to start debouncer: {}", e);
                Err(e)
            }
        }
    }

    fn subscribe<F>(&self, on_signal: F) -> Result<SubscriptionHandle, DebounceError>
    where
        F: FnMut() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let listener: Listener = Arc::new(move || {
            // Send only fails once the task is gone, i.e. during stop
            let _ = tx.send(RawSignalEvent { at: Instant::now() });
        });
        let registration = self.source.add_listener(listener)?;

        let id = Ulid::new();
        let live = Arc::new(AtomicBool::new(true));
        let span = debug_span!(
            parent: &self.span,
            "signal_debouncer",
            subscription = %id,
            source = %self.source.name()
        );

        let task = DebounceTask {
            config: self.config,
            cue: Arc::clone(&self.cue),
            live: Arc::clone(&live),
            events: rx,
            on_signal,
        };
        let task = runtime.spawn(task.run().instrument(span));

        debug!(
            subscription = %id,
            source = %self.source.name(),
            cooldown_ms = self.config.cooldown_ms(),
            settle_delay_ms = self.config.settle_delay_ms(),
            "Debouncer started"
        );

        Ok(SubscriptionHandle {
            id,
            registration,
            task,
            live,
            started: Arc::clone(&self.started),
            stopped: false,
        })
    }
}

struct DebounceTask<F> {
    config: DebounceConfig,
    cue: Arc<dyn Cue>,
    live: Arc<AtomicBool>,
    events: mpsc::UnboundedReceiver<RawSignalEvent>,
    on_signal: F,
}

impl<F: FnMut() + Send + 'static> DebounceTask<F> {
    async fn run(mut self) {
        let mut state = DebounceState::new();
        let settle = time::sleep(Duration::ZERO);
        tokio::pin!(settle);
        let mut armed = false;
        let mut open = true;
        let mut burst_len = 0usize;

        loop {
            tokio::select! {
                // An expired timer is handled before the next raw event so a
                // zero settle delay debounces per event.
                biased;

                () = &mut settle, if armed => {
                    armed = false;
                    self.settled(&mut state, burst_len);
                    burst_len = 0;
                }

                event = self.events.recv(), if open => match event {
                    Some(event) => {
                        // Reset replaces the pending deadline: one timer per burst
                        settle.as_mut().reset(event.at + self.config.settle_delay());
                        armed = true;
                        burst_len += 1;
                        trace!(burst_len, "Raw signal received");
                    }
                    None => {
                        // A burst cut off by the source closing still settles
                        open = false;
                        debug!(pending = armed, "Raw signal channel closed");
                    }
                },

                else => break,
            }
        }

        debug!("Debounce task finished");
    }

    fn settled(&mut self, state: &mut DebounceState, burst_len: usize) {
        if !self.live.load(Ordering::Acquire) {
            return;
        }

        match state.evaluate(Instant::now(), self.config.cooldown()) {
            Decision::Accepted => {
                debug!(burst_len, "Trigger accepted");
                if let Err(e) = self.cue.alert() {
                    warn!("Confirmation cue failed: {}", e);
                }
                (self.on_signal)();
            }
            Decision::Dropped { elapsed } => {
                trace!(
                    burst_len,
                    elapsed_ms = elapsed.as_millis() as u64,
                    cooldown_ms = self.config.cooldown_ms(),
                    "Trigger dropped within cooldown"
                );
            }
        }
    }
}

/// A live debouncer subscription
///
/// Stopping deregisters the raw listener, cancels any pending settle
/// timer and frees the debouncer for another `start`. Dropping the handle
/// stops it.
pub struct SubscriptionHandle {
    id: Ulid,
    registration: ListenerRegistration,
    task: JoinHandle<()>,
    live: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
    stopped: bool,
}

impl SubscriptionHandle {
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// False once stopped, or once the source closed and the last burst settled
    pub fn is_active(&self) -> bool {
        !self.stopped && !self.task.is_finished()
    }

    /// Release the subscription (idempotent)
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        self.live.store(false, Ordering::Release);
        self.registration.remove();
        self.task.abort();
        self.started.store(false, Ordering::Release);

        debug!(subscription = %self.id, "Debouncer stopped");
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
