//! Type-state builder for `DetectionEngine`.
//!
//! Parcel size ranges are required before `build()` is available.
//! `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use crate::config::DetectionCfg;
use crate::engine::{DetectionEngine, SessionFlow};
use crate::error::{BuildError, Result};
use crate::sizing::ParcelSizeRange;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `DetectionEngine`. All fields are validated on `build()`.
pub struct EngineBuilder<R> {
    cfg: Option<DetectionCfg>,
    ranges: Option<Vec<ParcelSizeRange>>,
    flow: SessionFlow,
    _r: PhantomData<R>,
}

impl Default for EngineBuilder<Missing> {
    fn default() -> Self {
        Self {
            cfg: None,
            ranges: None,
            flow: SessionFlow::default(),
            _r: PhantomData,
        }
    }
}

impl DetectionEngine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder<Missing> {
        EngineBuilder::default()
    }
}

fn validate_and_build(
    cfg: DetectionCfg,
    ranges: Vec<ParcelSizeRange>,
    flow: SessionFlow,
) -> Result<DetectionEngine> {
    if ranges.is_empty() {
        return Err(eyre::Report::new(BuildError::MissingRanges));
    }
    if cfg.poll_interval_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "poll_interval_ms must be > 0",
        )));
    }
    if cfg.long_timeout_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "long_timeout_ms must be > 0",
        )));
    }
    if cfg.countdown_tick_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "countdown_tick_ms must be > 0",
        )));
    }
    if cfg.tap_count == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tap_count must be >= 1",
        )));
    }
    if !cfg.test_weight_kg.is_finite() || cfg.test_weight_kg <= 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "test_weight_kg must be > 0",
        )));
    }
    for r in &ranges {
        if !r.min_kg.is_finite() || r.max_kg.is_some_and(|m| !m.is_finite() || m < r.min_kg) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "parcel range bounds must be finite and ordered",
            )));
        }
    }
    Ok(DetectionEngine::from_parts(cfg, ranges, flow))
}

impl<R> EngineBuilder<R> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<DetectionEngine> {
        let ranges = self
            .ranges
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRanges))?;
        validate_and_build(self.cfg.unwrap_or_default(), ranges, self.flow)
    }

    pub fn with_config(mut self, cfg: DetectionCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Entered by a "start" tap instead of automatically.
    pub fn tapped(mut self, tapped: bool) -> Self {
        self.flow.tapped = tapped;
        self
    }
}

impl EngineBuilder<Missing> {
    pub fn with_ranges(self, ranges: Vec<ParcelSizeRange>) -> EngineBuilder<Set> {
        EngineBuilder {
            cfg: self.cfg,
            ranges: Some(ranges),
            flow: self.flow,
            _r: PhantomData,
        }
    }
}

impl EngineBuilder<Set> {
    pub fn build(self) -> Result<DetectionEngine> {
        self.try_build()
    }
}
