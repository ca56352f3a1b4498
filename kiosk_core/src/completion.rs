//! Completion screen: count down, then return to the attract screen.

use std::time::Duration;

use kiosk_traits::{Clock, Navigator, Route};

use crate::config::CompletionCfg;
use crate::util::next_period;

#[derive(Debug, Clone)]
pub struct CompletionCountdown {
    tick_ms: u64,
    remaining_secs: u32,
    next_tick_ms: Option<u64>,
    done: bool,
}

impl CompletionCountdown {
    pub fn new(cfg: &CompletionCfg) -> Self {
        Self {
            tick_ms: cfg.tick_ms.max(1),
            remaining_secs: cfg.countdown_secs,
            next_tick_ms: None,
            done: false,
        }
    }

    /// Start ticking. A zero-length countdown returns immediately.
    pub fn start(&mut self, now: u64) -> Option<Route> {
        if self.remaining_secs == 0 {
            return Some(self.finish(Route::Attract));
        }
        self.next_tick_ms = Some(now.saturating_add(self.tick_ms));
        None
    }

    /// Apply every tick due by `now`; `Some(Attract)` once it reaches zero.
    pub fn advance(&mut self, now: u64) -> Option<Route> {
        while let Some(due) = self.next_tick_ms.filter(|d| *d <= now) {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                return Some(self.finish(Route::Attract));
            }
            self.next_tick_ms = Some(next_period(due, self.tick_ms, now));
        }
        None
    }

    /// Ship another parcel.
    pub fn continue_next(&mut self) -> Route {
        self.finish(Route::Detection)
    }

    pub fn close(&mut self) -> Route {
        self.finish(Route::Attract)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_tick_ms
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn finish(&mut self, route: Route) -> Route {
        self.next_tick_ms = None;
        self.done = true;
        route
    }
}

/// Drive a completion countdown to the end with `clock`, then navigate.
pub fn run_completion<C: Clock, N: Navigator>(cfg: &CompletionCfg, clock: &C, nav: &mut N) -> Route {
    let epoch = clock.now();
    let mut countdown = CompletionCountdown::new(cfg);
    let mut route = countdown.start(0);
    while route.is_none() {
        let Some(due) = countdown.next_due() else {
            break;
        };
        let now = clock.ms_since(epoch);
        clock.sleep(Duration::from_millis(due.saturating_sub(now)));
        route = countdown.advance(clock.ms_since(epoch));
        if route.is_none() {
            tracing::debug!(remaining_secs = countdown.remaining_secs(), "completion countdown");
        }
    }
    let route = route.unwrap_or(Route::Attract);
    nav.navigate(route);
    route
}
