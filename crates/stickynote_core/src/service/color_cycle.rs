//! Cooperative color-cycle timer for rare notes.
//!
//! The timer does not own a thread. The UI loop calls `poll` with the
//! current instant; dropping the timer together with its note cancels it.

use crate::model::color::Color;
use rand::Rng;
use std::time::{Duration, Instant};

/// Resample cadence.
pub const COLOR_CYCLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCycle {
    next_due: Instant,
}

impl ColorCycle {
    /// First resample is due immediately.
    pub fn start(now: Instant) -> Self {
        Self { next_due: now }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns a new color when a tick is due, rescheduling one interval
    /// after `now`. Missed ticks are not replayed.
    pub fn poll<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Option<Color> {
        if now < self.next_due {
            return None;
        }
        self.next_due = now + COLOR_CYCLE_INTERVAL;
        Some(Color::random_vivid(rng))
    }
}
