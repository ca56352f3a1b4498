//! Maps `Box<dyn Error>` from trait boundaries to typed `KioskError`.
//!
//! The traits in `kiosk_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `kiosk_hardware::HwError` downcasting.

use crate::error::KioskError;

/// Map a trait-boundary error to a typed `KioskError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> KioskError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<kiosk_hardware::error::HwError>() {
            return match hw {
                kiosk_hardware::error::HwError::Timeout => KioskError::Timeout,
                other => KioskError::Transport(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        KioskError::Timeout
    } else {
        KioskError::Transport(s)
    }
}
