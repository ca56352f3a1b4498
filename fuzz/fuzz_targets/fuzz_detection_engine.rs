#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

use kiosk_core::{DetectionEngine, DetectionStatus, Effect, ParcelSizeRange};

#[derive(Debug, Arbitrary)]
enum Step {
    Advance(u16),
    Weight(Option<f64>),
    WeightError,
    Classified(bool),
    ClassifyError,
    Tap,
    Continue,
}

fuzz_target!(|input: (bool, Vec<Step>)| {
    let (tapped, steps) = input;
    let Ok(mut engine) = DetectionEngine::builder()
        .with_ranges(vec![
            ParcelSizeRange::new("Small Box", 0.1, Some(1.0)),
            ParcelSizeRange::new("Medium Box", 1.0, None),
        ])
        .tapped(tapped)
        .build()
    else {
        return;
    };
    let mut now = 0u64;
    engine.start(now);
    let mut succeeded = false;
    for step in steps {
        let _: Vec<Effect> = match step {
            Step::Advance(ms) => {
                now += u64::from(ms);
                engine.advance(now)
            }
            Step::Weight(w) => engine.on_weight(now, Ok(w)),
            Step::WeightError => engine.on_weight(now, Err(kiosk_core::KioskError::Timeout)),
            Step::Classified(b) => engine.on_classification(Ok(b)),
            Step::ClassifyError => {
                engine.on_classification(Err(kiosk_core::KioskError::Transport("x".into())))
            }
            Step::Tap => engine.on_tap(now),
            Step::Continue => engine.continue_scanning(now),
        };
        // success never reverts
        if succeeded {
            assert_eq!(engine.status(), DetectionStatus::DetectSucceeded);
        }
        succeeded = engine.status() == DetectionStatus::DetectSucceeded;
    }
});
