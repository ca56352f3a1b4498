//! Millisecond timing helpers shared by the engine timers.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Whole seconds covering `ms`, rounded up (1 ms left still shows "1").
#[inline]
pub fn secs_ceil(ms: u64) -> u64 {
    ms.div_ceil(MILLIS_PER_SEC)
}

/// Earliest of two optional deadlines.
#[inline]
pub fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Next occurrence of a repeating timer that fired at `due`.
/// Missed periods are skipped instead of replayed.
#[inline]
pub fn next_period(due: u64, period_ms: u64, now: u64) -> u64 {
    let next = due.saturating_add(period_ms);
    if next <= now {
        now.saturating_add(period_ms)
    } else {
        next
    }
}
