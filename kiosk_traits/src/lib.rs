pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::time::Duration;

/// Weight sensor service (the kiosk scale).
///
/// `Ok(None)` means the service answered without a weight; callers treat
/// it the same as an empty tray.
pub trait WeightSensor {
    fn read_weight(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Remote box-presence classifier (camera inference webhook).
pub trait BoxClassifier {
    fn classify(&mut self, timeout: Duration)
    -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Symbolic kiosk screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Attract,
    Detection,
    Information,
    Complete,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Attract => "attract",
            Route::Detection => "detection",
            Route::Information => "information",
            Route::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation collaborator: screens only ever ask for a route.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}
