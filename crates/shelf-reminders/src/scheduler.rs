//! Local-notification scheduling seam
//!
//! Delivery is the host platform's job; a scheduler only accepts requests.

use crate::notice::Notice;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use ulid::Ulid;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("notification payload could not be encoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("scheduler rejected notification {id}: {reason}")]
    Rejected { id: Ulid, reason: String },
}

/// When a notification fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FireAt {
    Immediately,
    At(DateTime<Utc>),
}

/// One local notification, fired once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRequest {
    pub id: Ulid,
    pub title: String,
    pub body: String,
    pub fire: FireAt,
    pub payload: serde_json::Value,
}

impl NotificationRequest {
    pub fn from_notice(notice: &Notice, currency: &str, fire: FireAt) -> Result<Self, ScheduleError> {
        let rendered = notice.render(currency);
        Ok(Self {
            id: Ulid::new(),
            title: rendered.title,
            body: rendered.body,
            fire,
            payload: notice.payload()?,
        })
    }
}

/// Host local-notification API
pub trait NotificationScheduler: Send + Sync {
    fn schedule(&self, request: NotificationRequest) -> Result<(), ScheduleError>;

    /// Cancel everything not yet delivered; returns how many were cancelled
    fn cancel_all(&self) -> Result<usize, ScheduleError>;
}

/// Scheduler that only logs requests
#[derive(Debug, Default)]
pub struct LogScheduler;

impl NotificationScheduler for LogScheduler {
    fn schedule(&self, request: NotificationRequest) -> Result<(), ScheduleError> {
        match request.fire {
            FireAt::Immediately => {
                info!(id = %request.id, title = %request.title, "Notification shown");
            }
            FireAt::At(at) => {
                info!(id = %request.id, title = %request.title, fire_at = %at, "Notification scheduled");
            }
        }
        Ok(())
    }

    fn cancel_all(&self) -> Result<usize, ScheduleError> {
        info!("Cancelled all scheduled notifications");
        Ok(0)
    }
}

/// In-memory outbox of scheduled requests
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    outbox: Mutex<Vec<NotificationRequest>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests accepted so far, in scheduling order
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.outbox.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.outbox.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outbox.lock().is_empty()
    }
}

impl NotificationScheduler for MemoryScheduler {
    fn schedule(&self, request: NotificationRequest) -> Result<(), ScheduleError> {
        let mut outbox = self.outbox.lock();
        if outbox.iter().any(|r| r.id == request.id) {
            return Err(ScheduleError::Rejected {
                id: request.id,
                reason: "duplicate notification id".to_string(),
            });
        }
        outbox.push(request);
        Ok(())
    }

    fn cancel_all(&self) -> Result<usize, ScheduleError> {
        let mut outbox = self.outbox.lock();
        let cancelled = outbox.len();
        outbox.clear();
        Ok(cancelled)
    }
}
