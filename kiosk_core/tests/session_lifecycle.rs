//! Threaded session lifecycle: navigation outcomes and teardown.
//!
//! Verifies that:
//! - A detected parcel can be accepted and the screen moves on
//! - The idle timeout returns to the attract screen on its own
//! - Dropping a session with a request in flight returns promptly and
//!   nothing is published afterwards

use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use kiosk_core::mocks::NoopSensor;
use kiosk_core::{
    DetectionCfg, DetectionEngine, DetectionEvent, DetectionSession, DetectionStatus,
    KioskError, ParcelSizeRange, TimeoutKind, Timeouts,
};
use kiosk_hardware::{SimAnswer, SimulatedClassifier, SimulatedScale};
use kiosk_traits::{MonotonicClock, Route};

fn fast_cfg() -> DetectionCfg {
    DetectionCfg {
        poll_interval_ms: 20,
        short_timeout_ms: 200,
        long_timeout_ms: 600,
        warning_window_ms: 200,
        countdown_tick_ms: 50,
        tap_count: 5,
        tap_window_ms: 1500,
        test_weight_kg: 1.75,
    }
}

fn engine(cfg: DetectionCfg) -> DetectionEngine {
    DetectionEngine::builder()
        .with_config(cfg)
        .with_ranges(vec![
            ParcelSizeRange::new("Small Box", 0.1, Some(1.0)),
            ParcelSizeRange::new("Medium Box", 1.0, Some(3.0)),
        ])
        .tapped(true)
        .build()
        .expect("engine")
}

fn wait_for_status(session: &DetectionSession, status: DetectionStatus) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        match session.events().recv_timeout(Duration::from_millis(50)) {
            Ok(DetectionEvent::StatusChanged { status: s, .. }) if s == status => return true,
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
    false
}

#[test]
fn detected_parcel_is_accepted() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![Some(0.0), Some(0.8)]),
        SimulatedClassifier::always(SimAnswer::Box),
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    assert!(wait_for_status(&session, DetectionStatus::DetectSucceeded));
    session.proceed(None).expect("proceed");
    let events = session.events().clone();
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Information));
    assert_eq!(outcome.status, DetectionStatus::DetectSucceeded);
    assert_eq!(
        outcome.parcel.and_then(|p| p.size).as_deref(),
        Some("Small Box")
    );
    let item = events.try_iter().find_map(|e| match e {
        DetectionEvent::ItemUpdated(item) => Some(item),
        _ => None,
    });
    assert_eq!(item.and_then(|i| i.parcel_size).as_deref(), Some("Small Box"));
}

#[test]
fn idle_session_returns_to_attract() {
    let started = Instant::now();
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![None]),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Attract));
    assert_eq!(outcome.status, DetectionStatus::DetectFailed);
    assert_eq!(
        outcome.failure,
        Some(KioskError::TimeoutExpired(TimeoutKind::Long))
    );
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[test]
fn scale_timeouts_do_not_stop_the_screen() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::timing_out(),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Attract));
}

#[test]
fn taps_force_detection_through_the_handle() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![None]),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    for _ in 0..5 {
        assert!(session.tap());
    }
    assert!(wait_for_status(&session, DetectionStatus::DetectSucceeded));
    session.proceed(None).expect("proceed");
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Information));
    assert_eq!(
        outcome.parcel.and_then(|p| p.size).as_deref(),
        Some("Medium Box")
    );
}

#[test]
fn forced_detection_still_returns_to_attract_when_idle() {
    let started = Instant::now();
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![None]),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    for _ in 0..5 {
        assert!(session.tap());
    }
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Attract));
    assert_eq!(outcome.status, DetectionStatus::DetectSucceeded);
    assert_eq!(outcome.failure, None);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[test]
fn proceed_before_detection_is_rejected() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![None]),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    let err = session.proceed(None).expect_err("nothing detected");
    assert!(matches!(err, KioskError::InvalidState(_)));
    assert!(session.cancel());
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Attract));
    assert_eq!(outcome.failure, Some(KioskError::Cancelled));
}

#[test]
fn stop_keeps_the_detected_parcel_without_navigating() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![Some(0.0), Some(0.8)]),
        SimulatedClassifier::always(SimAnswer::Box),
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    assert!(wait_for_status(&session, DetectionStatus::DetectSucceeded));
    let outcome = session.stop().expect("join");
    assert_eq!(outcome.route, None);
    assert_eq!(outcome.status, DetectionStatus::DetectSucceeded);
    assert_eq!(
        outcome.parcel.and_then(|p| p.size).as_deref(),
        Some("Small Box")
    );
}

#[test]
fn canceller_ends_the_session() {
    let session = DetectionSession::spawn(
        engine(fast_cfg()),
        SimulatedScale::new(vec![None]),
        NoopSensor,
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    let canceller = session.canceller().expect("running");
    assert!(canceller.cancel());
    let outcome = session.wait().expect("join");
    assert_eq!(outcome.route, Some(Route::Attract));
    // the loop is gone; further cancels are refused
    assert!(!canceller.cancel());
}

#[test]
fn drop_with_request_in_flight_is_prompt_and_silent() {
    let cfg = DetectionCfg {
        long_timeout_ms: 10_000,
        short_timeout_ms: 10_000,
        ..fast_cfg()
    };
    let session = DetectionSession::spawn(
        engine(cfg),
        SimulatedScale::new(vec![Some(0.0), Some(0.8)]),
        SimulatedClassifier::always(SimAnswer::Box).with_latency(Duration::from_millis(300)),
        &Timeouts::default(),
        MonotonicClock::new(),
    );
    let events = session.events().clone();
    let canceller = session.canceller().expect("running");
    std::thread::sleep(Duration::from_millis(120));

    let started = Instant::now();
    drop(session);
    assert!(started.elapsed() < Duration::from_secs(2));

    let late: Vec<DetectionEvent> = events.try_iter().collect();
    assert!(!late.iter().any(|e| matches!(
        e,
        DetectionEvent::Navigate(_)
            | DetectionEvent::StatusChanged {
                status: DetectionStatus::DetectSucceeded,
                ..
            }
    )));
    assert_eq!(
        events.recv_timeout(Duration::from_millis(500)),
        Err(RecvTimeoutError::Disconnected)
    );
    // a canceller clone does not keep the loop alive
    assert!(!canceller.cancel());
}
