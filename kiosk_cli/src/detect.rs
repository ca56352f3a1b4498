//! Detection run: config mapping, service assembly, and session driving.

use std::time::{Duration, Instant};

use kiosk_core::error::Result as CoreResult;
use kiosk_core::{
    DetectionCfg, DetectionEngine, DetectionEvent, DetectionSession, DetectionStatus, ItemStore,
    KioskError, OrderBook, OrderItem, ParcelSizeRange, SessionOutcome, Timeouts,
};
use kiosk_hardware::{SimAnswer, SimulatedClassifier, SimulatedScale};
use kiosk_traits::{BoxClassifier, MonotonicClock, Navigator, Route, WeightSensor};

/// Scripted weights for `--sim`, e.g. `0,0.8` (`none` = empty read).
pub const SIM_WEIGHTS_ENV: &str = "KIOSK_TEST_SIM_WEIGHTS";
/// Scripted classifier answers for `--sim`, e.g. `false,true` (`fail` = error).
pub const SIM_IS_BOX_ENV: &str = "KIOSK_TEST_SIM_IS_BOX";

#[derive(Debug, Clone, Copy, Default)]
pub struct DetectOpts {
    pub tapped: bool,
    pub sim: bool,
    pub auto_continue: bool,
    pub long_timeout_ms: Option<u64>,
    pub short_timeout_ms: Option<u64>,
}

/// What the CLI reports after a run.
#[derive(Debug)]
pub struct DetectReport {
    pub outcome: SessionOutcome,
    pub item: Option<OrderItem>,
    /// Why the detected parcel could not be accepted.
    pub refused: Option<KioskError>,
    pub duration_ms: u64,
}

impl DetectReport {
    /// Failure to report: a refused parcel, else the session's own failure.
    pub fn failure(&self) -> Option<&KioskError> {
        self.refused.as_ref().or(self.outcome.failure.as_ref())
    }

    /// Detected without being accepted: the run stopped on the detection.
    pub fn detected_only(&self) -> bool {
        self.outcome.route.is_none()
            && self.refused.is_none()
            && self.outcome.status == DetectionStatus::DetectSucceeded
    }

    /// Map a run that neither moved on to the information screen nor
    /// stopped on a detection to an error.
    pub fn into_result(self) -> CoreResult<Self> {
        if self.outcome.route == Some(Route::Information) || self.detected_only() {
            return Ok(self);
        }
        if let Some(err) = self.refused {
            return Err(kiosk_core::error::Report::new(err));
        }
        let err = self
            .outcome
            .failure
            .clone()
            .unwrap_or_else(|| KioskError::InvalidState("detection ended without a parcel".into()));
        Err(kiosk_core::error::Report::new(err))
    }
}

/// Logs navigation requests; the CLI has no screens to switch.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, route: Route) {
        tracing::info!(route = %route, "navigate");
    }
}

pub fn run_detect(
    cfg: &kiosk_config::Config,
    ranges: Vec<ParcelSizeRange>,
    opts: DetectOpts,
) -> CoreResult<DetectReport> {
    let mut detection: DetectionCfg = (&cfg.detection).into();
    if let Some(ms) = opts.long_timeout_ms {
        detection.long_timeout_ms = ms;
        detection.warning_window_ms = detection.warning_window_ms.min(ms);
    }
    if let Some(ms) = opts.short_timeout_ms {
        detection.short_timeout_ms = ms;
    }
    let timeouts: Timeouts = (&cfg.hardware).into();
    let engine = DetectionEngine::builder()
        .with_config(detection)
        .with_ranges(ranges)
        .tapped(opts.tapped)
        .build()?;

    if opts.sim {
        let (scale, classifier) = sim_services()?;
        drive(engine, scale, classifier, &timeouts, opts)
    } else {
        tracing::info!(
            weight = %cfg.endpoints.weight,
            classifier = %cfg.endpoints.detect_parcel,
            "using HTTP services"
        );
        drive(
            engine,
            kiosk_hardware::HttpWeightSensor::new(cfg.endpoints.weight.clone()),
            kiosk_hardware::HttpBoxClassifier::new(cfg.endpoints.detect_parcel.clone()),
            &timeouts,
            opts,
        )
    }
}

fn drive<W, B>(
    engine: DetectionEngine,
    sensor: W,
    classifier: B,
    timeouts: &Timeouts,
    opts: DetectOpts,
) -> CoreResult<DetectReport>
where
    W: WeightSensor + Send + 'static,
    B: BoxClassifier + Send + 'static,
{
    let started = Instant::now();
    let session =
        DetectionSession::spawn(engine, sensor, classifier, timeouts, MonotonicClock::new());

    if let Some(canceller) = session.canceller() {
        // Only one handler per process; a second detect run keeps the first.
        if let Err(e) = ctrlc::set_handler(move || {
            canceller.cancel();
        }) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    let mut store = OrderBook::new();
    let mut nav = LogNavigator;
    let json = crate::cli::JSON_MODE.get().copied().unwrap_or(false);
    // Set when the run ends on the detection itself instead of a navigation.
    let mut stop_on_detection = false;
    let mut refused = None;

    while let Ok(event) = session.events().recv() {
        match event {
            DetectionEvent::StatusChanged { status, parcel } => {
                tracing::info!(status = %status, ?parcel, "detection status");
                if !json {
                    println!("status: {status}");
                }
                if status != DetectionStatus::DetectSucceeded {
                    continue;
                }
                if !opts.auto_continue {
                    stop_on_detection = true;
                    break;
                }
                if let Err(e) = session.proceed(store.current_item().cloned()) {
                    tracing::warn!(error = %e, "cannot continue with detected parcel");
                    refused = Some(e);
                    stop_on_detection = true;
                    break;
                }
            }
            DetectionEvent::Countdown(state) => {
                if state.warning_active {
                    tracing::debug!(seconds_remaining = state.seconds_remaining, "idle warning");
                    if !json {
                        println!("returning to start in {}s", state.seconds_remaining);
                    }
                }
            }
            DetectionEvent::ItemUpdated(item) => store.set_current_item(Some(item)),
            DetectionEvent::Navigate(route) => {
                nav.navigate(route);
                break;
            }
        }
    }

    let outcome = if stop_on_detection {
        session.stop()?
    } else {
        session.wait()?
    };
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(DetectReport {
        outcome,
        item: store.current_item().cloned(),
        refused,
        duration_ms,
    })
}

fn sim_services() -> CoreResult<(SimulatedScale, SimulatedClassifier)> {
    let weights = match std::env::var(SIM_WEIGHTS_ENV) {
        Ok(raw) => parse_sim_weights(&raw)?,
        Err(_) => vec![None],
    };
    let answers = match std::env::var(SIM_IS_BOX_ENV) {
        Ok(raw) => parse_sim_answers(&raw)?,
        Err(_) => vec![SimAnswer::Box],
    };
    tracing::info!(?weights, ?answers, "using simulated services");
    Ok((
        SimulatedScale::new(weights),
        SimulatedClassifier::new(answers).with_latency(Duration::from_millis(5)),
    ))
}

pub fn parse_sim_weights(raw: &str) -> CoreResult<Vec<Option<f64>>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.eq_ignore_ascii_case("none") {
                Ok(None)
            } else {
                s.parse::<f64>()
                    .map(Some)
                    .map_err(|e| eyre::eyre!("{SIM_WEIGHTS_ENV}: invalid weight {s:?}: {e}"))
            }
        })
        .collect()
}

pub fn parse_sim_answers(raw: &str) -> CoreResult<Vec<SimAnswer>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.to_ascii_lowercase().as_str() {
            "true" | "box" => Ok(SimAnswer::Box),
            "false" | "notbox" => Ok(SimAnswer::NotBox),
            "fail" => Ok(SimAnswer::Fail),
            _ => Err(eyre::eyre!("{SIM_IS_BOX_ENV}: invalid answer {s:?}")),
        })
        .collect()
}

pub fn failure_name(e: &KioskError) -> &'static str {
    match e {
        KioskError::Transport(_) => "Transport",
        KioskError::Timeout => "Timeout",
        KioskError::ClassificationNegative => "ClassificationNegative",
        KioskError::TimeoutExpired(kiosk_core::TimeoutKind::Short) => "ShortTimeout",
        KioskError::TimeoutExpired(kiosk_core::TimeoutKind::Long) => "LongTimeout",
        KioskError::Cancelled => "Cancelled",
        KioskError::Config(_) => "Config",
        KioskError::InvalidState(_) => "InvalidState",
        KioskError::UnsizedParcel { .. } => "UnsizedParcel",
    }
}
