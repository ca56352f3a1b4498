//! Human-readable error descriptions and structured JSON error formatting.

use kiosk_core::error::{BuildError, KioskError};
use kiosk_core::TimeoutKind;

use crate::detect::failure_name;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingRanges => {
                "What happened: No parcel size ranges are configured.\nLikely causes: The [[parcels]] list or the --parcels CSV is empty.\nHow to fix: Add at least one size range, then rerun.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML or command-line overrides.\nHow to fix: Edit the config file or the flags, then rerun."
            ),
        };
    }

    if let Some(ke) = err.downcast_ref::<KioskError>() {
        return match ke {
            KioskError::TimeoutExpired(TimeoutKind::Long) => {
                "What happened: Nobody interacted with the detection screen before the idle timeout.\nLikely causes: No parcel was placed on the scale, or the scale reports a constant weight.\nHow to fix: Place the parcel on the scale, or raise detection.long_timeout_ms.".to_string()
            }
            KioskError::TimeoutExpired(TimeoutKind::Short) => {
                "What happened: No parcel was detected within the short detection window.\nLikely causes: The classifier keeps answering that the object is not a box.\nHow to fix: Reposition the parcel, or raise detection.short_timeout_ms.".to_string()
            }
            KioskError::UnsizedParcel { weight_kg } => format!(
                "What happened: The detected parcel ({weight_kg} kg) fits no configured size range.\nLikely causes: The parcel is heavier or lighter than every [[parcels]] entry.\nHow to fix: Add or widen a size range in the config or the --parcels CSV."
            ),
            KioskError::Cancelled => {
                "What happened: Detection was cancelled.\nLikely causes: Ctrl-C or the cancel button.\nHow to fix: Start a new detection.".to_string()
            }
            KioskError::Timeout | KioskError::Transport(_) => format!(
                "What happened: {ke}.\nLikely causes: The scale or classifier service is down or unreachable.\nHow to fix: Check endpoints.weight and endpoints.detect_parcel, and hardware.request_timeout_ms."
            ),
            _ => format!(
                "What happened: {ke}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = format!("{err:#}").to_ascii_lowercase();

    if lower.contains("parcel range csv must have headers") {
        return "Invalid headers in parcel range CSV. Expected 'name,min_kg,max_kg,min_inclusive,max_inclusive'.".to_string();
    }

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        let detail = err.root_cause();
        return format!(
            "What happened: Configuration is invalid ({detail}).\nLikely causes: A typo or an out-of-range value in the TOML.\nHow to fix: Edit the config file, or run `config set <key> <value>`, and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for detection outcomes; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<KioskError>() {
        Some(KioskError::TimeoutExpired(TimeoutKind::Long)) => 3,
        Some(KioskError::Cancelled) => 4,
        Some(KioskError::UnsizedParcel { .. }) => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    if let Some(ke) = err.downcast_ref::<KioskError>() {
        return json!({ "reason": failure_name(ke), "message": humanize(err) }).to_string();
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return json!({ "reason": "Build", "message": humanize(err) }).to_string();
    }

    // Generic error JSON
    json!({ "reason": "Error", "message": humanize(err) }).to_string()
}
