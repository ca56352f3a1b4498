//! `From` implementations bridging `kiosk_config` types to `kiosk_core` types.

use crate::config::{CompletionCfg, DetectionCfg, Timeouts};
use crate::sizing::ParcelSizeRange;

// ── DetectionCfg ─────────────────────────────────────────────────────────────

impl From<&kiosk_config::Detection> for DetectionCfg {
    fn from(c: &kiosk_config::Detection) -> Self {
        Self {
            poll_interval_ms: c.poll_interval_ms,
            short_timeout_ms: c.short_timeout_ms,
            long_timeout_ms: c.long_timeout_ms,
            warning_window_ms: c.warning_window_ms,
            countdown_tick_ms: c.countdown_tick_ms,
            tap_count: c.tap_count,
            tap_window_ms: c.tap_window_ms,
            test_weight_kg: c.test_weight_kg,
        }
    }
}

// ── Timeouts ─────────────────────────────────────────────────────────────────

impl From<&kiosk_config::Hardware> for Timeouts {
    fn from(c: &kiosk_config::Hardware) -> Self {
        Self {
            request_ms: c.request_timeout_ms,
        }
    }
}

// ── CompletionCfg ────────────────────────────────────────────────────────────

impl From<&kiosk_config::Completion> for CompletionCfg {
    fn from(c: &kiosk_config::Completion) -> Self {
        Self {
            countdown_secs: c.countdown_secs,
            tick_ms: c.tick_ms,
        }
    }
}

// ── ParcelSizeRange ──────────────────────────────────────────────────────────

impl From<&kiosk_config::ParcelRange> for ParcelSizeRange {
    fn from(c: &kiosk_config::ParcelRange) -> Self {
        Self {
            name: c.name.clone(),
            min_kg: c.min_kg,
            max_kg: c.max_kg,
            min_inclusive: c.min_inclusive,
            max_inclusive: c.max_inclusive,
        }
    }
}

/// Map the configured bucket list, preserving order.
pub fn ranges_from_config(parcels: &[kiosk_config::ParcelRange]) -> Vec<ParcelSizeRange> {
    parcels.iter().map(ParcelSizeRange::from).collect()
}
