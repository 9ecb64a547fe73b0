//! Library notifications for Shelf
//!
//! This crate provides:
//! - Notification copy for loan, reservation and fine events
//! - Due-date reminder planning (fixed day offsets at a local hour)
//! - A scheduling seam for the host's local-notification API

pub mod notice;
pub mod plan;
pub mod scheduler;

// Re-exports
pub use notice::{Notice, RenderedNotice};
pub use plan::ReminderPlanner;
pub use scheduler::{
    FireAt, LogScheduler, MemoryScheduler, NotificationRequest, NotificationScheduler,
    ScheduleError,
};
