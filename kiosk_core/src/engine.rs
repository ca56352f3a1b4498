//! Detection screen state machine.
//!
//! The engine never blocks and never reads a clock. Callers pass the time as
//! milliseconds since the screen opened and carry out the returned
//! [`Effect`]s: issue a weight or classification request, or publish a
//! [`DetectionEvent`]. Results come back through `on_weight` and
//! `on_classification`.

use kiosk_traits::Route;

use crate::config::DetectionCfg;
use crate::error::{KioskError, TimeoutKind};
use crate::orders::OrderItem;
use crate::sizing::{ParcelSizeRange, size_for_weight};
use crate::status::DetectionStatus;
use crate::tap::TapCounter;
use crate::timeout::{TimeoutEvent, TimeoutState, TimeoutSupervisor};
use crate::util::next_period;
use crate::weight::{WeightObservation, WeightTracker};

/// How the visitor reached the detection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlow {
    /// Entered by tapping "start"; classification waits for a weight change.
    /// Otherwise the first usable reading is classified right away.
    pub tapped: bool,
}

/// Weight and size frozen at the moment of success.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedParcel {
    pub weight_kg: f64,
    /// `None` when no configured bucket contains the weight.
    pub size: Option<String>,
}

/// Something the outside world should see.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEvent {
    StatusChanged {
        status: DetectionStatus,
        parcel: Option<DetectedParcel>,
    },
    Countdown(TimeoutState),
    Navigate(Route),
    ItemUpdated(OrderItem),
}

/// Work requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestWeight,
    RequestClassification,
    Emit(DetectionEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    TapReset,
    Timeout,
    Poll,
}

#[derive(Debug)]
pub struct DetectionEngine {
    cfg: DetectionCfg,
    ranges: Vec<ParcelSizeRange>,
    flow: SessionFlow,
    status: DetectionStatus,
    parcel: Option<DetectedParcel>,
    failure: Option<KioskError>,
    started: bool,
    finished: bool,
    success_marked: bool,
    classification_attempted: bool,
    classify_in_flight: bool,
    poll_in_flight: bool,
    trigger_weight_kg: Option<f64>,
    next_poll_ms: Option<u64>,
    tracker: WeightTracker,
    timeouts: TimeoutSupervisor,
    taps: TapCounter,
}

impl DetectionEngine {
    pub(crate) fn from_parts(
        cfg: DetectionCfg,
        ranges: Vec<ParcelSizeRange>,
        flow: SessionFlow,
    ) -> Self {
        let timeouts = TimeoutSupervisor::new(&cfg);
        let taps = TapCounter::new(cfg.tap_count, cfg.tap_window_ms);
        Self {
            cfg,
            ranges,
            flow,
            status: DetectionStatus::Detecting,
            parcel: None,
            failure: None,
            started: false,
            finished: false,
            success_marked: false,
            classification_attempted: false,
            classify_in_flight: false,
            poll_in_flight: false,
            trigger_weight_kg: None,
            next_poll_ms: None,
            tracker: WeightTracker::new(),
            timeouts,
            taps,
        }
    }

    /// Arm the poller and both timeouts. Calling it twice is a no-op.
    pub fn start(&mut self, now: u64) -> Vec<Effect> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        self.timeouts.start(now);
        self.next_poll_ms = Some(now.saturating_add(self.cfg.poll_interval_ms));
        tracing::info!(tapped = self.flow.tapped, "detection started");
        vec![
            self.status_effect(),
            Effect::Emit(DetectionEvent::Countdown(self.timeouts.state())),
        ]
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance(&mut self, now: u64) -> Vec<Effect> {
        let mut out = Vec::new();
        while !self.finished {
            let Some((due, slot)) = self.next_slot() else {
                break;
            };
            if due > now {
                break;
            }
            match slot {
                Slot::TapReset => {
                    if self.taps.fire_due(now) {
                        tracing::trace!("tap counter reset");
                    }
                }
                Slot::Timeout => self.on_timeout(now, &mut out),
                Slot::Poll => {
                    self.next_poll_ms = Some(next_period(due, self.cfg.poll_interval_ms, now));
                    if self.poll_in_flight {
                        tracing::debug!("weight poll still in flight; tick skipped");
                    } else {
                        self.poll_in_flight = true;
                        out.push(Effect::RequestWeight);
                    }
                }
            }
        }
        out
    }

    /// Result of a weight request.
    pub fn on_weight(&mut self, now: u64, reading: Result<Option<f64>, KioskError>) -> Vec<Effect> {
        if self.finished {
            tracing::debug!("weight result after finish ignored");
            return Vec::new();
        }
        self.poll_in_flight = false;
        let reading = match reading {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "weight poll failed");
                return Vec::new();
            }
        };
        let obs = self.tracker.observe(reading);
        if self.success_marked {
            return Vec::new();
        }
        let mut out = Vec::new();
        let sample = match obs {
            WeightObservation::Empty => return out,
            WeightObservation::Changed {
                previous_kg,
                sample,
            } => {
                tracing::info!(
                    previous_kg,
                    weight_kg = sample.rounded_kg,
                    "weight change detected"
                );
                self.timeouts.reset_long(now);
                out.push(Effect::Emit(DetectionEvent::Countdown(
                    self.timeouts.state(),
                )));
                sample
            }
            WeightObservation::First(sample) | WeightObservation::Unchanged(sample) => {
                if self.flow.tapped || self.classification_attempted {
                    return out;
                }
                sample
            }
        };
        self.attempt_classification(sample.raw_kg, &mut out);
        out
    }

    /// Result of a classification request.
    pub fn on_classification(&mut self, result: Result<bool, KioskError>) -> Vec<Effect> {
        if self.finished {
            tracing::debug!("classification result after finish ignored");
            return Vec::new();
        }
        self.classify_in_flight = false;
        if self.success_marked {
            return Vec::new();
        }
        let mut out = Vec::new();
        match result {
            Ok(true) => {
                let weight = self.trigger_weight_kg.take().unwrap_or_default();
                self.timeouts.cancel_all();
                self.succeed(weight, &mut out);
            }
            Ok(false) => self.fail(KioskError::ClassificationNegative, &mut out),
            Err(e) => {
                tracing::warn!(error = %e, "classification failed");
                self.fail(e, &mut out);
            }
        }
        out
    }

    /// Hidden operator gesture; enough quick taps force a success.
    pub fn on_tap(&mut self, now: u64) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.finished || self.success_marked {
            return out;
        }
        if self.taps.register(now) {
            tracing::info!(weight_kg = self.cfg.test_weight_kg, "manual override triggered");
            // The idle deadline keeps running; only the short timer and the
            // countdown stop.
            self.timeouts.cancel_short();
            self.timeouts.stop_countdown();
            self.succeed(self.cfg.test_weight_kg, &mut out);
        }
        out
    }

    /// Operator is still working; restart the idle window.
    pub fn continue_scanning(&mut self, now: u64) -> Vec<Effect> {
        if self.finished || self.success_marked {
            return Vec::new();
        }
        self.timeouts.reset_long(now);
        vec![Effect::Emit(DetectionEvent::Countdown(
            self.timeouts.state(),
        ))]
    }

    pub fn cancel(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.finished {
            return out;
        }
        tracing::info!("detection cancelled");
        self.failure = Some(KioskError::Cancelled);
        self.finish(Route::Attract, &mut out);
        out
    }

    /// Attach the detected parcel to `current` (or a new item) and move on.
    pub fn proceed(&mut self, current: Option<&OrderItem>) -> Result<Vec<Effect>, KioskError> {
        if self.finished {
            return Err(KioskError::InvalidState("detection already finished".into()));
        }
        let (weight_kg, size) = match (&self.status, &self.parcel) {
            (
                DetectionStatus::DetectSucceeded,
                Some(DetectedParcel {
                    weight_kg,
                    size: Some(size),
                }),
            ) => (*weight_kg, size.clone()),
            (
                DetectionStatus::DetectSucceeded,
                Some(DetectedParcel {
                    weight_kg,
                    size: None,
                }),
            ) => {
                return Err(KioskError::UnsizedParcel {
                    weight_kg: *weight_kg,
                });
            }
            _ => {
                return Err(KioskError::InvalidState(
                    "a detected parcel with a size is required".into(),
                ));
            }
        };
        let item = match current {
            Some(item) => item.with_parcel(weight_kg, &size),
            None => OrderItem::new().with_parcel(weight_kg, &size),
        };
        tracing::info!(item_id = %item.id, weight_kg, size = %size, "parcel accepted");
        let mut out = vec![Effect::Emit(DetectionEvent::ItemUpdated(item))];
        self.finish(Route::Information, &mut out);
        Ok(out)
    }

    /// Drop every timer without navigating. Later inputs are ignored.
    pub fn teardown(&mut self) {
        if !self.finished {
            tracing::debug!("detection torn down");
        }
        self.stop_timers();
        self.finished = true;
    }

    pub fn status(&self) -> DetectionStatus {
        self.status
    }

    pub fn parcel(&self) -> Option<&DetectedParcel> {
        self.parcel.as_ref()
    }

    /// Why the last attempt failed (or why the screen was left).
    pub fn failure(&self) -> Option<&KioskError> {
        self.failure.as_ref()
    }

    pub fn timeout_state(&self) -> TimeoutState {
        self.timeouts.state()
    }

    pub fn last_observed_kg(&self) -> Option<f64> {
        self.tracker.last_observed_kg()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn flow(&self) -> SessionFlow {
        self.flow
    }

    pub fn tap_count(&self) -> u32 {
        self.taps.count()
    }

    /// Earliest pending timer, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.next_slot().map(|(due, _)| due)
    }

    fn next_slot(&self) -> Option<(u64, Slot)> {
        if self.finished {
            return None;
        }
        [
            (self.taps.next_due(), Slot::TapReset),
            (self.timeouts.next_due(), Slot::Timeout),
            (self.next_poll_ms, Slot::Poll),
        ]
        .into_iter()
        .filter_map(|(due, slot)| due.map(|d| (d, slot)))
        // min_by_key keeps the first of equal keys, so the array order breaks ties
        .min_by_key(|(due, _)| *due)
    }

    fn on_timeout(&mut self, now: u64, out: &mut Vec<Effect>) {
        match self.timeouts.fire_due(now) {
            Some(TimeoutEvent::ShortExpired) => {
                if !self.success_marked {
                    tracing::info!("short timeout expired without detection");
                    self.fail(KioskError::TimeoutExpired(TimeoutKind::Short), out);
                }
            }
            Some(TimeoutEvent::Countdown) => {
                let state = self.timeouts.state();
                if state.warning_active {
                    tracing::debug!(seconds_remaining = state.seconds_remaining, "idle warning");
                }
                out.push(Effect::Emit(DetectionEvent::Countdown(state)));
            }
            Some(TimeoutEvent::LongExpired) => {
                tracing::info!("long timeout expired; returning to attract screen");
                if !self.success_marked {
                    self.failure = Some(KioskError::TimeoutExpired(TimeoutKind::Long));
                }
                self.finish(Route::Attract, out);
            }
            None => {}
        }
    }

    fn attempt_classification(&mut self, raw_kg: f64, out: &mut Vec<Effect>) {
        if self.success_marked {
            return;
        }
        if self.classify_in_flight {
            tracing::debug!("classification already in flight; attempt skipped");
            return;
        }
        self.classification_attempted = true;
        self.classify_in_flight = true;
        self.trigger_weight_kg = Some(raw_kg);
        out.push(Effect::RequestClassification);
    }

    fn succeed(&mut self, weight_kg: f64, out: &mut Vec<Effect>) {
        let size = size_for_weight(&self.ranges, weight_kg).map(|r| r.name.clone());
        if size.is_none() {
            tracing::warn!(weight_kg, "no parcel size range matches weight");
        }
        tracing::info!(weight_kg, size = ?size, "parcel detected");
        self.parcel = Some(DetectedParcel { weight_kg, size });
        self.success_marked = true;
        self.failure = None;
        self.status = DetectionStatus::DetectSucceeded;
        self.taps.cancel();
        out.push(self.status_effect());
    }

    fn fail(&mut self, reason: KioskError, out: &mut Vec<Effect>) {
        if self.success_marked {
            return;
        }
        tracing::info!(reason = %reason, "detection attempt failed");
        self.failure = Some(reason);
        if self.status != DetectionStatus::DetectFailed {
            self.status = DetectionStatus::DetectFailed;
            out.push(self.status_effect());
        }
    }

    fn finish(&mut self, route: Route, out: &mut Vec<Effect>) {
        self.stop_timers();
        self.finished = true;
        out.push(Effect::Emit(DetectionEvent::Navigate(route)));
    }

    fn stop_timers(&mut self) {
        self.timeouts.cancel_all();
        self.taps.cancel();
        self.next_poll_ms = None;
    }

    fn status_effect(&self) -> Effect {
        Effect::Emit(DetectionEvent::StatusChanged {
            status: self.status,
            parcel: self.parcel.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(tapped: bool) -> DetectionEngine {
        DetectionEngine::from_parts(
            DetectionCfg::default(),
            vec![
                ParcelSizeRange::new("Small Box", 0.1, Some(1.0)),
                ParcelSizeRange::new("Medium Box", 1.0, Some(3.0)),
            ],
            SessionFlow { tapped },
        )
    }

    fn requests(fx: &[Effect]) -> Vec<Effect> {
        fx.iter()
            .filter(|e| !matches!(e, Effect::Emit(_)))
            .cloned()
            .collect()
    }

    #[test]
    fn first_poll_is_one_interval_after_start() {
        let mut e = engine(true);
        e.start(0);
        assert_eq!(e.next_due(), Some(1000));
        assert!(e.advance(999).is_empty());
        assert_eq!(requests(&e.advance(1000)), vec![Effect::RequestWeight]);
    }

    #[test]
    fn poll_tick_skipped_while_in_flight() {
        let mut e = engine(true);
        e.start(0);
        assert_eq!(requests(&e.advance(1000)), vec![Effect::RequestWeight]);
        assert!(requests(&e.advance(2000)).is_empty());
        e.on_weight(2100, Ok(None));
        assert_eq!(requests(&e.advance(3000)), vec![Effect::RequestWeight]);
    }

    #[test]
    fn untapped_flow_classifies_first_reading_once() {
        let mut e = engine(false);
        e.start(0);
        e.advance(1000);
        let fx = e.on_weight(1000, Ok(Some(0.8)));
        assert_eq!(fx, vec![Effect::RequestClassification]);
        e.on_classification(Ok(false));
        e.advance(2000);
        assert!(e.on_weight(2000, Ok(Some(0.8))).is_empty());
    }

    #[test]
    fn start_twice_is_noop() {
        let mut e = engine(true);
        assert_eq!(e.start(0).len(), 2);
        assert!(e.start(10).is_empty());
    }
}
