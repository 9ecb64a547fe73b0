//! Due-date reminder planning
//!
//! A loan gets one reminder per configured lead day, at a fixed local hour
//! on `due_date - lead`. Reminders already in the past are skipped, as are
//! local times that do not exist (DST gaps).

use crate::notice::Notice;
use crate::scheduler::{FireAt, NotificationRequest, NotificationScheduler, ScheduleError};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use shelf_core::ReminderConfig;
use tracing::{debug, warn};
use ulid::Ulid;

pub struct ReminderPlanner {
    config: ReminderConfig,
}

impl ReminderPlanner {
    pub fn new(config: ReminderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Reminders for a loan due on `due_date`, earliest first
    ///
    /// `now` fixes both the cut-off and the time zone reminders are
    /// computed in.
    pub fn plan<Tz: TimeZone>(
        &self,
        book_title: &str,
        due_date: NaiveDate,
        now: &DateTime<Tz>,
    ) -> Result<Vec<NotificationRequest>, ScheduleError> {
        let mut planned: Vec<(DateTime<Utc>, Notice)> = Vec::new();

        for &lead in &self.config.lead_days {
            let Some(fire_at) = self.fire_time(due_date, lead, now) else {
                continue;
            };
            if fire_at <= now.with_timezone(&Utc) {
                debug!(book = book_title, lead, "Reminder already in the past, skipping");
                continue;
            }

            let book_title = book_title.to_string();
            let notice = if lead == 0 {
                Notice::DueToday { book_title }
            } else {
                Notice::DueSoon { book_title, days_left: lead }
            };
            planned.push((fire_at, notice));
        }

        planned.sort_by_key(|(fire_at, _)| *fire_at);
        planned
            .iter()
            .map(|(fire_at, notice)| {
                NotificationRequest::from_notice(notice, &self.config.currency, FireAt::At(*fire_at))
            })
            .collect()
    }

    fn fire_time<Tz: TimeZone>(
        &self,
        due_date: NaiveDate,
        lead: u32,
        now: &DateTime<Tz>,
    ) -> Option<DateTime<Utc>> {
        let day = due_date.checked_sub_days(Days::new(u64::from(lead)))?;
        let naive = day.and_hms_opt(self.config.reminder_hour, 0, 0)?;

        match now.timezone().from_local_datetime(&naive).earliest() {
            Some(local) => Some(local.with_timezone(&Utc)),
            None => {
                warn!(%naive, "Reminder time does not exist in local time zone, skipping");
                None
            }
        }
    }

    /// Plan and hand reminders to `scheduler`; returns how many were scheduled
    pub fn schedule_due_date_reminders<Tz: TimeZone>(
        &self,
        scheduler: &dyn NotificationScheduler,
        book_title: &str,
        due_date: NaiveDate,
        now: &DateTime<Tz>,
    ) -> Result<usize, ScheduleError> {
        let requests = self.plan(book_title, due_date, now)?;
        let count = requests.len();
        for request in requests {
            scheduler.schedule(request)?;
        }
        debug!(book = book_title, %due_date, count, "Scheduled due-date reminders");
        Ok(count)
    }

    /// Show `notice` right away
    pub fn notify(
        &self,
        scheduler: &dyn NotificationScheduler,
        notice: &Notice,
    ) -> Result<Ulid, ScheduleError> {
        let request = NotificationRequest::from_notice(notice, &self.config.currency, FireAt::Immediately)?;
        let id = request.id;
        scheduler.schedule(request)?;
        Ok(id)
    }

    /// Issue notice plus due-date reminders; returns the total scheduled
    pub fn book_issued<Tz: TimeZone>(
        &self,
        scheduler: &dyn NotificationScheduler,
        book_title: &str,
        due_date: NaiveDate,
        now: &DateTime<Tz>,
    ) -> Result<usize, ScheduleError> {
        self.notify(
            scheduler,
            &Notice::BookIssued {
                book_title: book_title.to_string(),
                due_date,
            },
        )?;
        Ok(1 + self.schedule_due_date_reminders(scheduler, book_title, due_date, now)?)
    }
}
