//! Test and helper mocks for kiosk_core

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A sensor that always errors; stands in when no service is reachable.
pub struct NoopSensor;

impl kiosk_traits::WeightSensor for NoopSensor {
    fn read_weight(&mut self, _timeout: Duration) -> Result<Option<f64>, BoxError> {
        Err(Box::new(std::io::Error::other("noop sensor")))
    }
}

impl kiosk_traits::BoxClassifier for NoopSensor {
    fn classify(&mut self, _timeout: Duration) -> Result<bool, BoxError> {
        Err(Box::new(std::io::Error::other("noop sensor")))
    }
}

/// Navigator that records every route it was sent to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub routes: Vec<kiosk_traits::Route>,
}

impl kiosk_traits::Navigator for RecordingNavigator {
    fn navigate(&mut self, route: kiosk_traits::Route) {
        self.routes.push(route);
    }
}
