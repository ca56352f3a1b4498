#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core detection logic (hardware-agnostic).
//!
//! This crate provides the detection screen engine of the parcel kiosk. All
//! service interactions go through `kiosk_traits::WeightSensor` and
//! `kiosk_traits::BoxClassifier`.
//!
//! ## Architecture
//!
//! - **Engine**: deterministic state machine on millisecond timestamps (`engine`)
//! - **Weight**: 0.1 kg rounding and change detection (`weight`)
//! - **Timeouts**: short/long deadlines and the idle countdown (`timeout`)
//! - **Manual override**: hidden tap gesture (`tap`)
//! - **Sizing**: first-match parcel size buckets (`sizing`)
//! - **Session**: event-loop thread plus request workers (`runner`)
//! - **Orders**: order book and current item store (`orders`)
//! - **Completion**: post-confirmation countdown (`completion`)

pub mod builder;
pub mod completion;
pub mod config;
pub mod conversions;
pub mod engine;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod orders;
pub mod runner;
pub mod sizing;
pub mod status;
pub mod tap;
pub mod timeout;
pub mod util;
pub mod weight;
mod worker;

pub use builder::EngineBuilder;
pub use completion::{CompletionCountdown, run_completion};
pub use config::{CompletionCfg, DetectionCfg, Timeouts};
pub use conversions::ranges_from_config;
pub use engine::{DetectedParcel, DetectionEngine, DetectionEvent, Effect, SessionFlow};
pub use error::{BuildError, KioskError, TimeoutKind};
pub use orders::{ContactDetails, ItemStore, Order, OrderBook, OrderItem};
pub use runner::{DetectionSession, SessionCanceller, SessionOutcome};
pub use sizing::{ParcelSizeRange, size_for_weight};
pub use status::DetectionStatus;
pub use timeout::TimeoutState;
pub use weight::{WeightObservation, WeightSample, WeightTracker, round_up_tenth};
