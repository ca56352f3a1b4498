//! Hidden tap gesture that forces a simulated detection.

#[derive(Debug, Clone)]
pub struct TapCounter {
    required: u32,
    window_ms: u64,
    count: u32,
    reset_due: Option<u64>,
}

impl TapCounter {
    pub fn new(required: u32, window_ms: u64) -> Self {
        Self {
            required: required.max(1),
            window_ms,
            count: 0,
            reset_due: None,
        }
    }

    /// Count a tap; `true` when it completes the gesture.
    ///
    /// The counter resets after `window_ms` without a tap, and after a
    /// completed gesture.
    pub fn register(&mut self, now: u64) -> bool {
        if self.reset_due.is_some_and(|d| d <= now) {
            self.count = 0;
        }
        self.count += 1;
        if self.count >= self.required {
            self.cancel();
            return true;
        }
        self.reset_due = Some(now.saturating_add(self.window_ms));
        false
    }

    /// Apply the inactivity reset if it is due.
    pub fn fire_due(&mut self, now: u64) -> bool {
        if self.reset_due.is_some_and(|d| d <= now) {
            self.cancel();
            return true;
        }
        false
    }

    pub fn next_due(&self) -> Option<u64> {
        self.reset_due
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cancel(&mut self) {
        self.count = 0;
        self.reset_due = None;
    }
}
