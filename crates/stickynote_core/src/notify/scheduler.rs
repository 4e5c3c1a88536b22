//! One-shot reminder scheduling.
//!
//! # Responsibility
//! - Parse a strict 24-hour `HH:MM` time of day.
//! - Compute the next occurrence of that time and the delay until it.
//! - Run one detached background wait per schedule, then deliver once.
//!
//! # Invariants
//! - The fire time is strictly after "now": today if still ahead, otherwise
//!   tomorrow.
//! - A background wait only captures immutable data (title, message, delay,
//!   sink) plus its own state cell.
//! - Each `PendingNotification` delivers at most once; dropping the handle
//!   does not cancel it.

use crate::notify::sink::NotificationSink;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid time-of-day regex"));

/// Title shown on every reminder.
pub const NOTIFICATION_TITLE: &str = "Sticky Notes 🔔";
/// Message used when the user leaves the message field empty.
pub const DEFAULT_REMINDER_MESSAGE: &str = "It's time to check your notes!";
/// Help text for the scheduling dialog.
pub const SCHEDULE_HELP_TEXT: &str = "1. Enter time in HH:MM (24-hour format).\n\
2. Enter your message (optional).\n\
3. Click 'Confirm' to schedule the notification.\n\n\
Your notification will appear at the scheduled time.\n\
If the time has passed today, it'll be scheduled for tomorrow.\n\n\
Keep the app open to receive notifications.";

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// System local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Scheduling failures.
#[derive(Debug)]
pub enum ScheduleError {
    /// Input is empty or not a valid `HH:MM`.
    InvalidTimeFormat(String),
    /// The background wait could not be started.
    Spawn(std::io::Error),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeFormat(value) if value.is_empty() => {
                write!(f, "please enter a time in HH:MM (24-hour format)")
            }
            Self::InvalidTimeFormat(value) => {
                write!(f, "invalid time `{value}`; use HH:MM (24-hour format)")
            }
            Self::Spawn(err) => write!(f, "failed to start reminder timer: {err}"),
        }
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            Self::InvalidTimeFormat(_) => None,
        }
    }
}

/// Parses `HH:MM` with a two-digit hour `00..=23` and minute `00..=59`.
///
/// Surrounding whitespace is ignored.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = value.trim();
    let invalid = || ScheduleError::InvalidTimeFormat(trimmed.to_string());

    let captures = TIME_OF_DAY_RE.captures(trimmed).ok_or_else(invalid)?;
    let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Next occurrence of `time` strictly after `now`.
pub fn next_fire_time(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// A computed, not yet started reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub fire_at: NaiveDateTime,
    pub delay: Duration,
    pub message: String,
}

impl ScheduledNotification {
    /// Builds the reminder for `time_of_day` as seen from `now`.
    pub fn plan(
        time_of_day: &str,
        message: &str,
        now: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        let time = parse_time_of_day(time_of_day)?;
        let fire_at = next_fire_time(now, time);
        let delay = (fire_at - now).to_std().unwrap_or(Duration::ZERO);
        let message = if message.is_empty() {
            DEFAULT_REMINDER_MESSAGE.to_string()
        } else {
            message.to_string()
        };

        Ok(Self {
            fire_at,
            delay,
            message,
        })
    }
}

/// Lifecycle of one scheduled reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationState {
    Scheduled,
    Fired,
    Cancelled,
}

#[derive(Debug)]
struct PendingShared {
    state: Mutex<NotificationState>,
    wake: Condvar,
}

impl PendingShared {
    fn lock(&self) -> MutexGuard<'_, NotificationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running background wait.
#[derive(Clone, Debug)]
pub struct PendingNotification {
    id: Uuid,
    fire_at: NaiveDateTime,
    shared: Arc<PendingShared>,
}

impl PendingNotification {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fire_at(&self) -> NaiveDateTime {
        self.fire_at
    }

    pub fn state(&self) -> NotificationState {
        *self.shared.lock()
    }

    /// Stops delivery if it has not happened yet. Returns whether this call
    /// cancelled it.
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.lock();
        if *state != NotificationState::Scheduled {
            return false;
        }
        *state = NotificationState::Cancelled;
        self.shared.wake.notify_all();
        info!(
            "event=notification_cancel module=notify status=ok id={}",
            self.id
        );
        true
    }
}

/// Starts reminder waits against a clock and a delivery sink.
#[derive(Clone)]
pub struct NotificationScheduler {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
}

impl NotificationScheduler {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { clock, sink }
    }

    /// Validates input and computes the reminder without starting it.
    pub fn plan(
        &self,
        time_of_day: &str,
        message: &str,
    ) -> Result<ScheduledNotification, ScheduleError> {
        ScheduledNotification::plan(time_of_day, message, self.clock.now()).inspect_err(|_| {
            info!("event=notification_schedule module=notify status=rejected error_code=invalid_time_format");
        })
    }

    /// Plans the reminder and starts its background wait.
    ///
    /// # Errors
    /// - `InvalidTimeFormat` for empty or malformed input; nothing is started.
    /// - `Spawn` when the background thread cannot be created.
    pub fn schedule(
        &self,
        time_of_day: &str,
        message: &str,
    ) -> Result<PendingNotification, ScheduleError> {
        let plan = self.plan(time_of_day, message)?;
        self.start(plan)
    }

    /// Starts the background wait for an already planned reminder.
    pub fn start(&self, plan: ScheduledNotification) -> Result<PendingNotification, ScheduleError> {
        let pending = PendingNotification {
            id: Uuid::new_v4(),
            fire_at: plan.fire_at,
            shared: Arc::new(PendingShared {
                state: Mutex::new(NotificationState::Scheduled),
                wake: Condvar::new(),
            }),
        };

        let shared = Arc::clone(&pending.shared);
        let sink = Arc::clone(&self.sink);
        let id = pending.id;
        let ScheduledNotification { delay, message, .. } = plan;

        std::thread::Builder::new()
            .name(format!("reminder-{id}"))
            .spawn(move || wait_and_deliver(id, shared, sink, delay, message))
            .map_err(ScheduleError::Spawn)?;

        info!(
            "event=notification_schedule module=notify status=ok id={} delay_ms={}",
            id,
            delay.as_millis()
        );
        Ok(pending)
    }
}

fn wait_and_deliver(
    id: Uuid,
    shared: Arc<PendingShared>,
    sink: Arc<dyn NotificationSink>,
    delay: Duration,
    message: String,
) {
    {
        let guard = shared.lock();
        let (mut state, _) = shared
            .wake
            .wait_timeout_while(guard, delay, |state| *state == NotificationState::Scheduled)
            .unwrap_or_else(PoisonError::into_inner);
        if *state != NotificationState::Scheduled {
            return;
        }
        *state = NotificationState::Fired;
    }

    if let Err(err) = sink.deliver(NOTIFICATION_TITLE, &message) {
        warn!(
            "event=notification_fire module=notify status=error id={} error={}",
            id, err
        );
        return;
    }
    info!("event=notification_fire module=notify status=ok id={id}");
}

#[cfg(test)]
mod tests {
    use super::{next_fire_time, parse_time_of_day, ScheduleError, ScheduledNotification};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn parses_strict_two_digit_times() {
        assert_eq!(
            parse_time_of_day("09:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day(" 23:59 ").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_times() {
        for input in ["", "   ", "9am", "9:00", "24:00", "12:60", "12:00:00", "ab:cd"] {
            let err = parse_time_of_day(input).unwrap_err();
            assert!(
                matches!(err, ScheduleError::InvalidTimeFormat(_)),
                "input `{input}` should be rejected"
            );
        }
    }

    #[test]
    fn same_minute_as_now_rolls_to_tomorrow() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let fire = next_fire_time(now, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(fire.date(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn empty_message_uses_default_reminder() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let plan = ScheduledNotification::plan("08:30", "", now).unwrap();
        assert_eq!(plan.message, "It's time to check your notes!");
        assert_eq!(plan.delay.as_secs(), 30 * 60);
    }

    #[test]
    fn whitespace_message_is_delivered_as_given() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let plan = ScheduledNotification::plan("08:30", "  ", now).unwrap();
        assert_eq!(plan.message, "  ");
    }
}
