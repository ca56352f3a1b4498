pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod payload;
pub mod util;

#[cfg(feature = "http")]
pub use http::{HttpBoxClassifier, HttpWeightSensor};

use std::time::Duration;

use kiosk_traits::{BoxClassifier, WeightSensor};

use crate::error::HwError;

/// Simulated scale replaying a scripted sequence of readings.
///
/// The last reading repeats once the script is exhausted; an empty script
/// behaves like an empty tray.
#[derive(Debug, Clone, Default)]
pub struct SimulatedScale {
    readings: Vec<Option<f64>>,
    idx: usize,
    fail_with_timeout: bool,
}

impl SimulatedScale {
    pub fn new(readings: Vec<Option<f64>>) -> Self {
        Self {
            readings,
            idx: 0,
            fail_with_timeout: false,
        }
    }

    /// A scale service that never answers in time.
    pub fn timing_out() -> Self {
        Self {
            fail_with_timeout: true,
            ..Self::default()
        }
    }
}

impl WeightSensor for SimulatedScale {
    fn read_weight(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_with_timeout {
            return Err(Box::new(HwError::Timeout));
        }
        let reading = match self.readings.get(self.idx) {
            Some(r) => {
                self.idx += 1;
                *r
            }
            None => self.readings.last().copied().flatten(),
        };
        tracing::trace!(?reading, "simulated scale read");
        Ok(reading)
    }
}

/// Scripted answer of a simulated classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimAnswer {
    Box,
    NotBox,
    Fail,
}

/// Simulated box classifier replaying scripted answers with optional latency.
#[derive(Debug, Clone)]
pub struct SimulatedClassifier {
    answers: Vec<SimAnswer>,
    idx: usize,
    latency: Duration,
}

impl SimulatedClassifier {
    pub fn new(answers: Vec<SimAnswer>) -> Self {
        Self {
            answers,
            idx: 0,
            latency: Duration::ZERO,
        }
    }

    pub fn always(answer: SimAnswer) -> Self {
        Self::new(vec![answer])
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl BoxClassifier for SimulatedClassifier {
    fn classify(
        &mut self,
        _timeout: Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        let answer = match self.answers.get(self.idx) {
            Some(a) => {
                self.idx += 1;
                *a
            }
            None => self.answers.last().copied().unwrap_or(SimAnswer::NotBox),
        };
        match answer {
            SimAnswer::Box => Ok(true),
            SimAnswer::NotBox => Ok(false),
            SimAnswer::Fail => Err(Box::new(HwError::Http(
                "simulated classifier failure".to_string(),
            ))),
        }
    }
}
