//! Configuration management command
//!
//! Provides CLI interface to view and edit the Shelf configuration.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use shelf_core::config::{self as system_config, ShelfConfig};
use shelf_core::DebounceConfig;

const KEYS: &[&str] = &[
    "shake.cooldown_ms",
    "shake.settle_delay_ms",
    "shake.confirm_before_action",
    "shake.enabled",
    "shake.target_screen",
    "reminders.lead_days",
    "reminders.reminder_hour",
    "reminders.currency",
];

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "Shelf Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    let mut section = "";
    for &key in KEYS {
        let (table, name) = key.split_once('.').unwrap_or(("", key));
        if table != section {
            if !section.is_empty() {
                println!();
            }
            println!("{}", format!("[{}]", table).yellow());
            section = table;
        }
        println!("  {} = {}", name.cyan(), get_value(&config, key)?);
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!("  cooldown_ms: 0-60,000");
    println!("  settle_delay_ms: 0-5,000");
    println!("  reminder_hour: 0-23");
    println!("  lead_days: unique values 0-30");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;
    set_value(&mut config, key, value)?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;
    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!(
        "{}",
        "Note: Restart `shelf listen` for changes to take effect".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", system_config::example_config());
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Use 'shelf config list' to see available keys.",
        key
    )
}

fn get_value(config: &ShelfConfig, key: &str) -> Result<String> {
    let value = match key {
        "shake.cooldown_ms" => config.shake.debounce.cooldown_ms().to_string(),
        "shake.settle_delay_ms" => config.shake.debounce.settle_delay_ms().to_string(),
        "shake.confirm_before_action" => config.shake.confirm_before_action.to_string(),
        "shake.enabled" => config.shake.enabled.to_string(),
        "shake.target_screen" => config.shake.target_screen.clone(),
        "reminders.lead_days" => config
            .reminders
            .lead_days
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(","),
        "reminders.reminder_hour" => config.reminders.reminder_hour.to_string(),
        "reminders.currency" => config.reminders.currency.clone(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

fn set_value(config: &mut ShelfConfig, key: &str, value: &str) -> Result<()> {
    let debounce = config.shake.debounce;

    match key {
        "shake.cooldown_ms" => {
            let val: u64 = value.parse()
                .context("Invalid value: must be a non-negative integer")?;
            config.shake.debounce = DebounceConfig::new(val, debounce.settle_delay_ms());
        }
        "shake.settle_delay_ms" => {
            let val: u64 = value.parse()
                .context("Invalid value: must be a non-negative integer")?;
            config.shake.debounce = DebounceConfig::new(debounce.cooldown_ms(), val);
        }
        "shake.confirm_before_action" => {
            config.shake.confirm_before_action = value.parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "shake.enabled" => {
            config.shake.enabled = value.parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "shake.target_screen" => {
            config.shake.target_screen = value.to_string();
        }
        "reminders.lead_days" => {
            config.reminders.lead_days = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<u32>())
                .collect::<Result<_, _>>()
                .context("Invalid value: must be comma-separated non-negative integers")?;
        }
        "reminders.reminder_hour" => {
            config.reminders.reminder_hour = value.parse()
                .context("Invalid value: must be an hour between 0 and 23")?;
        }
        "reminders.currency" => {
            config.reminders.currency = value.to_string();
        }
        _ => return Err(unknown_key(key)),
    }

    Ok(())
}
