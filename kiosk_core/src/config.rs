//! Runtime configuration for the detection engine.
//!
//! These are the structs the engine consumes. They are separate from the
//! TOML schema in `kiosk_config`; see `conversions` for the mapping.

/// Detection screen timing and manual override parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCfg {
    /// Weight poll period (ms).
    pub poll_interval_ms: u64,
    /// No success within this window (from screen entry) marks the attempt failed.
    pub short_timeout_ms: u64,
    /// No weight change within this window returns to the attract screen.
    pub long_timeout_ms: u64,
    /// Countdown warning is active once this little time is left (ms).
    pub warning_window_ms: u64,
    /// Countdown refresh period (ms).
    pub countdown_tick_ms: u64,
    /// Taps needed to force a simulated detection.
    pub tap_count: u32,
    /// Tap counter resets after this much inactivity (ms).
    pub tap_window_ms: u64,
    /// Weight assigned by the simulated detection (kg).
    pub test_weight_kg: f64,
}

impl Default for DetectionCfg {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            short_timeout_ms: 10_000,
            long_timeout_ms: 60_000,
            warning_window_ms: 10_000,
            countdown_tick_ms: 1000,
            tap_count: 5,
            tap_window_ms: 1500,
            test_weight_kg: 1.75,
        }
    }
}

/// Per-request service timeouts.
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Max wait for one scale or classifier request (ms).
    pub request_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_ms: 800 }
    }
}

/// Completion screen auto-return.
#[derive(Debug, Clone)]
pub struct CompletionCfg {
    pub countdown_secs: u32,
    pub tick_ms: u64,
}

impl Default for CompletionCfg {
    fn default() -> Self {
        Self {
            countdown_secs: 5,
            tick_ms: 1000,
        }
    }
}
