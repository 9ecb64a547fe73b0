//! Preview the notifications scheduled for a loan

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};
use owo_colors::OwoColorize;
use shelf_core::config as system_config;
use shelf_reminders::{FireAt, MemoryScheduler, NotificationRequest, ReminderPlanner};
use std::fmt::Display;

pub async fn run(
    title: &str,
    due: NaiveDate,
    now: Option<DateTime<FixedOffset>>,
    issued: bool,
) -> Result<()> {
    let config = system_config::load().context("Failed to load config")?;
    let planner = ReminderPlanner::new(config.reminders);

    match now {
        Some(now) => preview(&planner, title, due, &now, issued),
        None => preview(&planner, title, due, &Local::now(), issued),
    }
}

fn preview<Tz>(
    planner: &ReminderPlanner,
    title: &str,
    due: NaiveDate,
    now: &DateTime<Tz>,
    issued: bool,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let scheduler = MemoryScheduler::new();
    let count = if issued {
        planner.book_issued(&scheduler, title, due, now)
    } else {
        planner.schedule_due_date_reminders(&scheduler, title, due, now)
    }
    .context("Failed to schedule reminders")?;

    println!(
        "{} \"{}\" due {}",
        "Reminders for".bold(),
        title,
        due.format("%Y-%m-%d").cyan()
    );

    if count == 0 {
        println!("{}", "No reminders left to schedule".yellow());
        return Ok(());
    }

    for request in scheduler.pending() {
        println!("  {}  {}", fire_label(&request, &now.timezone()).yellow(), request.title.bold());
        println!("  {}  {}", " ".repeat(16), request.body.dimmed());
    }

    Ok(())
}

fn fire_label<Tz>(request: &NotificationRequest, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match request.fire {
        FireAt::Immediately => format!("{:<16}", "now"),
        FireAt::At(at) => at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
    }
}
