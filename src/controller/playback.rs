// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Repeating playback task.
//!
//! The UI has no timers of its own; it polls the controller every frame
//! with the current time and the ticker reports how many periods have
//! elapsed since the last poll.

use std::time::{Duration, Instant};

/// A fixed-rate repeating task. At most one schedule is active.
#[derive(Debug, Default)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`, replacing any active schedule.
    pub fn start(&mut self, period: Duration, now: Instant) {
        // a zero period would report unbounded ticks
        self.period = period.max(Duration::from_millis(1));
        self.next_due = Some(now + self.period);
    }

    /// Cancel the schedule. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next tick, if active.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Consume one elapsed tick, if one is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}
