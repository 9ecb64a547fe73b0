//! Shake-to-navigate
//!
//! Builds the action a [`SignalDebouncer`] dispatches when a shake is
//! accepted: open the target screen directly, or ask for confirmation
//! first. Screen resolution and dialog presentation belong to the host.

use crate::debounce::{SignalDebouncer, SubscriptionHandle};
use shelf_core::{DebounceError, ShakeConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Opens screens by name
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Presents a confirmation dialog
///
/// Implementations call `on_accept` only if the user accepts; they must
/// not block the caller while the dialog is open.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: ConfirmPrompt, on_accept: Box<dyn FnOnce() + Send>);
}

/// Text of the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub accept_label: String,
    pub cancel_label: String,
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self {
            title: "Open Library Assistant".to_string(),
            message: "Shake detected! Open chat?".to_string(),
            accept_label: "Open".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Shake-to-navigate action
pub struct ShakeNavigation {
    config: ShakeConfig,
    navigator: Arc<dyn Navigator>,
    confirmer: Option<Arc<dyn Confirmer>>,
    prompt: ConfirmPrompt,
}

impl ShakeNavigation {
    pub fn new(config: ShakeConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            config,
            navigator,
            confirmer: None,
            prompt: ConfirmPrompt::default(),
        }
    }

    /// Dialog used when `confirm_before_action` is set
    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    /// Dialog text; defaults to [`ConfirmPrompt::default`]
    pub fn with_prompt(mut self, prompt: ConfirmPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    /// Handle one accepted shake
    pub fn trigger(&self) {
        if !self.config.enabled {
            debug!("Shake accepted but navigation is disabled");
            return;
        }

        let target = self.config.target_screen.clone();

        if self.config.confirm_before_action {
            if let Some(confirmer) = &self.confirmer {
                debug!(target = %target, "Asking for confirmation before navigating");
                let navigator = Arc::clone(&self.navigator);
                confirmer.confirm(
                    self.prompt.clone(),
                    Box::new(move || {
                        info!(target = %target, "Shake confirmed, navigating");
                        navigator.navigate(&target);
                    }),
                );
                return;
            }
            warn!("Confirmation requested but no confirmer configured; navigating directly");
        }

        info!(target = %target, "Shake detected, navigating");
        self.navigator.navigate(&target);
    }

    /// Consume into a debouncer action
    pub fn into_action(self) -> impl FnMut() + Send + 'static {
        move || self.trigger()
    }

    /// Start `debouncer` with this navigation as its action
    pub fn attach(self, debouncer: &SignalDebouncer) -> Result<SubscriptionHandle, DebounceError> {
        debouncer.start(self.into_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.visited.lock().push(target.to_string());
        }
    }

    /// Holds the accept callback until the test answers the dialog
    #[derive(Default)]
    struct PendingConfirmer {
        prompts: Mutex<Vec<ConfirmPrompt>>,
        pending: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl PendingConfirmer {
        fn accept_all(&self) {
            let pending: Vec<_> = self.pending.lock().drain(..).collect();
            for on_accept in pending {
                on_accept();
            }
        }

        fn cancel_all(&self) {
            self.pending.lock().clear();
        }
    }

    impl Confirmer for PendingConfirmer {
        fn confirm(&self, prompt: ConfirmPrompt, on_accept: Box<dyn FnOnce() + Send>) {
            self.prompts.lock().push(prompt);
            self.pending.lock().push(on_accept);
        }
    }

    fn config(confirm: bool, enabled: bool) -> ShakeConfig {
        ShakeConfig {
            confirm_before_action: confirm,
            enabled,
            target_screen: "BookChat".to_string(),
            ..ShakeConfig::default()
        }
    }

    #[test]
    fn test_direct_navigation() {
        let navigator = Arc::new(RecordingNavigator::default());
        let shake = ShakeNavigation::new(config(false, true), navigator.clone());

        shake.trigger();
        shake.trigger();
        assert_eq!(*navigator.visited.lock(), vec!["BookChat", "BookChat"]);
    }

    #[test]
    fn test_disabled_navigation_ignores_triggers() {
        let navigator = Arc::new(RecordingNavigator::default());
        let confirmer = Arc::new(PendingConfirmer::default());
        let shake = ShakeNavigation::new(config(true, false), navigator.clone())
            .with_confirmer(confirmer.clone());

        shake.trigger();
        assert!(navigator.visited.lock().is_empty());
        assert!(confirmer.prompts.lock().is_empty());
    }

    #[test]
    fn test_confirmation_accept_and_cancel() {
        let navigator = Arc::new(RecordingNavigator::default());
        let confirmer = Arc::new(PendingConfirmer::default());
        let shake = ShakeNavigation::new(config(true, true), navigator.clone())
            .with_confirmer(confirmer.clone());

        shake.trigger();
        assert!(navigator.visited.lock().is_empty());
        assert_eq!(confirmer.prompts.lock()[0], ConfirmPrompt::default());

        confirmer.cancel_all();
        assert!(navigator.visited.lock().is_empty());

        shake.trigger();
        confirmer.accept_all();
        assert_eq!(*navigator.visited.lock(), vec!["BookChat"]);
    }

    #[test]
    fn test_custom_prompt_reaches_confirmer() {
        let navigator = Arc::new(RecordingNavigator::default());
        let confirmer = Arc::new(PendingConfirmer::default());
        let prompt = ConfirmPrompt {
            message: "Shake detected! Open BookChat?".to_string(),
            ..ConfirmPrompt::default()
        };
        let shake = ShakeNavigation::new(config(true, true), navigator.clone())
            .with_confirmer(confirmer.clone())
            .with_prompt(prompt.clone());

        shake.trigger();
        assert_eq!(*confirmer.prompts.lock(), vec![prompt]);
        confirmer.accept_all();
        assert_eq!(*navigator.visited.lock(), vec!["BookChat"]);
    }

    #[test]
    fn test_missing_confirmer_navigates_directly() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut action = ShakeNavigation::new(config(true, true), navigator.clone()).into_action();

        action();
        assert_eq!(*navigator.visited.lock(), vec!["BookChat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_navigates_once_per_shake() {
        use crate::platform::EventEmitter;
        use shelf_core::DebounceConfig;
        use std::time::Duration;

        let emitter = Arc::new(EventEmitter::new("shake"));
        let debouncer = SignalDebouncer::new(emitter.clone(), DebounceConfig::new(2000, 200));
        let navigator = Arc::new(RecordingNavigator::default());
        let _handle = ShakeNavigation::new(config(false, true), navigator.clone())
            .attach(&debouncer)
            .unwrap();

        for _ in 0..3 {
            emitter.emit();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(*navigator.visited.lock(), vec!["BookChat"]);
    }
}
