//! Short/long detection deadlines and the warning countdown.
//!
//! Pure bookkeeping on millisecond timestamps; the caller decides when
//! `fire_due` runs.

use crate::config::DetectionCfg;
use crate::util::{earliest, next_period, secs_ceil};

/// Countdown snapshot for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutState {
    /// When the long timeout fires, if armed.
    pub deadline_at_ms: Option<u64>,
    /// When the warning starts, if armed.
    pub warning_at_ms: Option<u64>,
    /// Seconds until the long timeout, rounded up.
    pub seconds_remaining: u64,
    pub warning_active: bool,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutEvent {
    ShortExpired,
    Countdown,
    LongExpired,
}

#[derive(Debug, Clone)]
pub struct TimeoutSupervisor {
    short_ms: u64,
    long_ms: u64,
    warning_ms: u64,
    tick_ms: u64,
    short_due: Option<u64>,
    long_due: Option<u64>,
    tick_due: Option<u64>,
    seconds_remaining: u64,
    warning_active: bool,
}

impl TimeoutSupervisor {
    pub fn new(cfg: &DetectionCfg) -> Self {
        Self {
            short_ms: cfg.short_timeout_ms,
            long_ms: cfg.long_timeout_ms,
            warning_ms: cfg.warning_window_ms,
            tick_ms: cfg.countdown_tick_ms.max(1),
            short_due: None,
            long_due: None,
            tick_due: None,
            seconds_remaining: secs_ceil(cfg.long_timeout_ms),
            warning_active: false,
        }
    }

    /// Arm both deadlines and the countdown ticker.
    pub fn start(&mut self, now: u64) {
        self.short_due = Some(now.saturating_add(self.short_ms));
        self.reset_long(now);
    }

    /// Restart the long deadline from `now` and clear the warning.
    /// The short deadline is left alone.
    pub fn reset_long(&mut self, now: u64) {
        self.long_due = Some(now.saturating_add(self.long_ms));
        self.tick_due = Some(now.saturating_add(self.tick_ms));
        self.seconds_remaining = secs_ceil(self.long_ms);
        self.warning_active = false;
    }

    pub fn cancel_short(&mut self) {
        self.short_due = None;
    }

    /// Stop the countdown ticker and clear the warning. The long deadline
    /// stays armed.
    pub fn stop_countdown(&mut self) {
        self.tick_due = None;
        self.warning_active = false;
    }

    pub fn cancel_long(&mut self) {
        self.long_due = None;
        self.tick_due = None;
        self.warning_active = false;
    }

    pub fn cancel_all(&mut self) {
        self.cancel_short();
        self.cancel_long();
    }

    pub fn is_armed(&self) -> bool {
        self.short_due.is_some() || self.long_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        earliest(earliest(self.short_due, self.tick_due), self.long_due)
    }

    /// Fire the earliest timer due at or before `now`, if any.
    ///
    /// Timers due at the same instant fire short, countdown, long.
    pub fn fire_due(&mut self, now: u64) -> Option<TimeoutEvent> {
        let due = self.next_due().filter(|d| *d <= now)?;
        if self.short_due == Some(due) {
            self.short_due = None;
            return Some(TimeoutEvent::ShortExpired);
        }
        if self.tick_due == Some(due) {
            let remaining = self.long_due.map_or(0, |d| d.saturating_sub(now));
            self.seconds_remaining = secs_ceil(remaining);
            self.warning_active = remaining <= self.warning_ms;
            self.tick_due = Some(next_period(due, self.tick_ms, now));
            return Some(TimeoutEvent::Countdown);
        }
        self.cancel_all();
        Some(TimeoutEvent::LongExpired)
    }

    pub fn state(&self) -> TimeoutState {
        TimeoutState {
            deadline_at_ms: self.long_due,
            warning_at_ms: self.long_due.map(|d| d.saturating_sub(self.warning_ms)),
            seconds_remaining: self.seconds_remaining,
            warning_active: self.warning_active,
        }
    }
}
