//! Run shake-to-navigate in the foreground

use crate::terminal::{TerminalConfirmer, TerminalNavigator};
use anyhow::{Context, Result};
use clap::ValueEnum;
use owo_colors::OwoColorize;
use shelf_core::config as system_config;
use shelf_core::{DebounceConfig, ShakeConfig};
use shelf_watcher::platform::{self, LineSource};
use shelf_watcher::{
    BackgroundCue, BellCue, ConfirmPrompt, Cue, ShakeNavigation, SignalDebouncer, SignalSource, SilentCue,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info_span;

/// Where raw shake events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// SIGUSR1 delivered to this process
    Signal,
    /// Characters typed on stdin, one raw event each
    Stdin,
}

#[derive(Debug, Clone)]
pub struct ListenOptions {
    pub source: SourceKind,
    pub cooldown_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
    pub confirm: bool,
    pub target: Option<String>,
    pub bell: bool,
    pub run_for_ms: Option<u64>,
}

impl ListenOptions {
    /// Layer command-line overrides over the config file
    pub fn apply(&self, config: &mut ShakeConfig) {
        config.debounce = DebounceConfig::new(
            self.cooldown_ms.unwrap_or(config.debounce.cooldown_ms()),
            self.settle_delay_ms.unwrap_or(config.debounce.settle_delay_ms()),
        );
        if self.confirm {
            config.confirm_before_action = true;
        }
        if let Some(target) = &self.target {
            config.target_screen = target.clone();
        }
    }
}

/// Dialog naming the screen a shake opens
fn prompt_for(target: &str) -> ConfirmPrompt {
    ConfirmPrompt {
        message: format!("Shake detected! Open {}?", target),
        ..ConfirmPrompt::default()
    }
}

pub async fn run(opts: ListenOptions) -> Result<()> {
    let mut config = system_config::load().context("Failed to load config")?.shake;
    opts.apply(&mut config);
    config.validate().context("Invalid shake settings")?;

    if config.confirm_before_action && opts.source == SourceKind::Stdin {
        anyhow::bail!("Confirmation answers are read from stdin; use --source signal with --confirm");
    }

    let source: Arc<dyn SignalSource> = match opts.source {
        SourceKind::Signal => platform::default_source(),
        SourceKind::Stdin => Arc::new(LineSource::stdin()),
    };
    let cue: Arc<dyn Cue> = if opts.bell {
        Arc::new(BackgroundCue::spawn(BellCue::default(), 4).context("Failed to start bell cue")?)
    } else {
        Arc::new(SilentCue)
    };

    let debouncer = SignalDebouncer::new(source, config.debounce)
        .with_cue(cue)
        .with_span(info_span!("listen", target = %config.target_screen));

    let mut navigation = ShakeNavigation::new(config.clone(), Arc::new(TerminalNavigator::default()))
        .with_prompt(prompt_for(&config.target_screen));
    if config.confirm_before_action {
        let confirmer = TerminalConfirmer::spawn().context("Failed to start confirmation prompt")?;
        navigation = navigation.with_confirmer(Arc::new(confirmer));
    }

    let mut handle = navigation
        .attach(&debouncer)
        .context("Shake navigation is unavailable")?;

    println!(
        "{} {} (cooldown {}ms, settle {}ms)",
        "Listening on".bold(),
        debouncer.source_name().cyan(),
        config.debounce.cooldown_ms(),
        config.debounce.settle_delay_ms()
    );
    match opts.source {
        SourceKind::Signal => println!(
            "{}",
            format!("Shake with: kill -USR1 {}", std::process::id()).dimmed()
        ),
        SourceKind::Stdin => println!("{}", "Type s and Enter to shake (sss = one burst)".dimmed()),
    }
    if !config.enabled {
        println!("{}", "Navigation disabled in config; shakes are only logged".yellow());
    }

    match opts.run_for_ms {
        Some(ms) => {
            tokio::select! {
                result = tokio::signal::ctrl_c() => result.context("Failed to listen for Ctrl-C")?,
                () = tokio::time::sleep(Duration::from_millis(ms)) => {}
            }
        }
        None => tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?,
    }

    handle.stop();
    println!("{}", "Stopped".dimmed());
    Ok(())
}
