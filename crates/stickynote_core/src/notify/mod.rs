//! Reminder notifications.
//!
//! # Responsibility
//! - Turn a time-of-day input into a one-shot background reminder.
//! - Deliver reminders through pluggable backends.

pub mod scheduler;
pub mod sink;
