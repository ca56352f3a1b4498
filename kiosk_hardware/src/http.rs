//! HTTP-backed sensors for the scale service and the box classification webhook.

use std::time::Duration;

use kiosk_traits::{BoxClassifier, WeightSensor};
use tracing::{debug, trace};

use crate::error::{HwError, Result};
use crate::payload::{parse_classification_body, parse_weight_body};
use crate::util::{unix_millis, with_cache_buster};

fn map_ureq(e: ureq::Error) -> HwError {
    match e {
        ureq::Error::Status(code, _) => HwError::Status(code),
        ureq::Error::Transport(t) => {
            let msg = t.to_string();
            if msg.to_ascii_lowercase().contains("timed out") {
                HwError::Timeout
            } else {
                HwError::Http(msg)
            }
        }
    }
}

fn get_body(agent: &ureq::Agent, url: &str, timeout: Duration) -> Result<String> {
    let resp = agent.get(url).timeout(timeout).call().map_err(map_ureq)?;
    Ok(resp.into_string()?)
}

pub struct HttpWeightSensor {
    agent: ureq::Agent,
    url: String,
}

impl HttpWeightSensor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch(&mut self, timeout: Duration) -> Result<Option<f64>> {
        let body = get_body(&self.agent, &self.url, timeout)?;
        let weight = parse_weight_body(&body)?;
        trace!(url = %self.url, ?weight, "weight sample");
        Ok(weight)
    }
}

impl WeightSensor for HttpWeightSensor {
    fn read_weight(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Option<f64>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.fetch(timeout)?)
    }
}

pub struct HttpBoxClassifier {
    agent: ureq::Agent,
    url: String,
}

impl HttpBoxClassifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            url: url.into(),
        }
    }

    pub fn fetch(&mut self, timeout: Duration) -> Result<bool> {
        let url = with_cache_buster(&self.url, unix_millis());
        let body = get_body(&self.agent, &url, timeout)?;
        let is_box = parse_classification_body(&body)?;
        debug!(is_box, "classification answered");
        Ok(is_box)
    }
}

impl BoxClassifier for HttpBoxClassifier {
    fn classify(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.fetch(timeout)?)
    }
}
