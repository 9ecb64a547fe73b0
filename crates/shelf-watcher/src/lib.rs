//! Device signal watching for Shelf
//!
//! This crate turns a noisy raw signal (a phone shake fires several raw
//! events in quick succession) into one debounced action:
//! - Settle delay to collapse a burst into one logical trigger
//! - Cooldown window between accepted triggers
//! - Confirmation cue on acceptance
//! - Shake-to-navigate action with optional confirmation
//! - Scoped listener release on every teardown path

pub mod cue;
pub mod debounce;
pub mod navigate;
pub mod platform;
pub mod source;

// Re-exports
pub use cue::{BackgroundCue, BellCue, Cue, CueError, SilentCue};
pub use debounce::{Decision, DebounceState, RawSignalEvent, SignalDebouncer, SubscriptionHandle};
pub use navigate::{ConfirmPrompt, Confirmer, Navigator, ShakeNavigation};
pub use shelf_core::{DebounceConfig, DebounceError, ShakeConfig};
pub use source::{Listener, ListenerRegistration, SignalSource};
