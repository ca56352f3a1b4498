#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema, persisted store and parcel range loading for the kiosk.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config.
//! - `ConfigStore` persists the config file and merges partial updates.
//! - Parcel size ranges can be replaced from a CSV file with strict headers.
use serde::{Deserialize, Serialize};

mod store;

pub use store::ConfigStore;

/// Service endpoints the kiosk talks to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    /// Backend order server
    pub server: String,
    /// Camera stream
    pub camera: String,
    /// Depth camera (parcel dimensions)
    pub dimensions: String,
    /// Scale service; answers `{ "data": { "weight": number } }`
    pub weight: String,
    /// Sender and recipient manifest service
    pub manifest: String,
    /// Box classification webhook; answers `{ "is_box": boolean }`
    pub detect_parcel: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            server: "http://localhost:8000".to_string(),
            camera: "http://localhost:7070".to_string(),
            dimensions: "http://localhost:6060".to_string(),
            weight: "http://localhost:3030/weight".to_string(),
            manifest: "http://localhost:4040".to_string(),
            detect_parcel: "http://localhost:7070/detect".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Detection {
    /// Weight poll period (ms)
    pub poll_interval_ms: u64,
    /// No detection at all within this window marks the attempt as failed
    pub short_timeout_ms: u64,
    /// No weight change within this window returns to the attract screen
    pub long_timeout_ms: u64,
    /// Countdown becomes visible this long before the long timeout
    pub warning_window_ms: u64,
    /// Countdown refresh period (ms)
    pub countdown_tick_ms: u64,
    /// Taps needed to force a simulated detection
    pub tap_count: u32,
    /// Tap counter resets after this much inactivity (ms)
    pub tap_window_ms: u64,
    /// Weight assigned by the simulated detection (kg)
    pub test_weight_kg: f64,
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            short_timeout_ms: 10_000,
            long_timeout_ms: 60_000,
            warning_window_ms: 10_000,
            countdown_tick_ms: 1000,
            tap_count: 5,
            tap_window_ms: 1500,
            test_weight_kg: 1.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Hardware {
    /// Per-request timeout for the scale and classifier services (ms)
    pub request_timeout_ms: u64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            request_timeout_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Completion {
    /// Seconds shown on the completion screen before returning to attract
    pub countdown_secs: u32,
    /// Countdown tick period (ms)
    pub tick_ms: u64,
}

impl Default for Completion {
    fn default() -> Self {
        Self {
            countdown_secs: 5,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Logging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>, // path to .log (JSON lines)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
}

/// One parcel size bucket. `max_kg` absent means open-ended.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParcelRange {
    pub name: String,
    /// Display label, e.g. "0.1kg < x <= 1kg"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    pub min_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kg: Option<f64>,
    #[serde(default)]
    pub min_inclusive: bool,
    #[serde(default)]
    pub max_inclusive: bool,
}

fn bucket(name: &str, label: &str, min_kg: f64, max_kg: f64) -> ParcelRange {
    ParcelRange {
        name: name.to_string(),
        range: Some(label.to_string()),
        min_kg,
        max_kg: Some(max_kg),
        min_inclusive: false,
        max_inclusive: true,
    }
}

pub fn default_parcels() -> Vec<ParcelRange> {
    vec![
        bucket("Small Box", "0.1kg < x <= 1kg", 0.1, 1.0),
        bucket("Medium Box", "1kg < x <= 3kg", 1.0, 3.0),
        bucket("Large Box", "3kg < x <= 5kg", 3.0, 5.0),
        bucket("Extra Large", "5kg < x <= 10kg", 5.0, 10.0),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub detection: Detection,
    pub hardware: Hardware,
    pub completion: Completion,
    pub logging: Logging,
    /// Ordered size buckets; first match wins.
    pub parcels: Vec<ParcelRange>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            detection: Detection::default(),
            hardware: Hardware::default(),
            completion: Completion::default(),
            logging: Logging::default(),
            parcels: default_parcels(),
        }
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Parcel range CSV schema.
///
/// Expected headers:
/// name,min_kg,max_kg,min_inclusive,max_inclusive
///
/// An empty `max_kg` makes the range open-ended.
#[derive(Debug, Deserialize)]
struct ParcelRangeRow {
    name: String,
    min_kg: f64,
    max_kg: Option<f64>,
    min_inclusive: bool,
    max_inclusive: bool,
}

pub fn load_parcel_ranges_csv(path: &std::path::Path) -> eyre::Result<Vec<ParcelRange>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open parcel range CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["name", "min_kg", "max_kg", "min_inclusive", "max_inclusive"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "parcel range CSV must have headers '{}', got: {}",
            expected.join(","),
            actual.join(",")
        );
    }

    let mut ranges = Vec::new();
    for (idx, rec) in rdr.deserialize::<ParcelRangeRow>().enumerate() {
        match rec {
            Ok(row) => ranges.push(ParcelRange {
                name: row.name,
                range: None,
                min_kg: row.min_kg,
                max_kg: row.max_kg,
                min_inclusive: row.min_inclusive,
                max_inclusive: row.max_inclusive,
            }),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    validate_parcels(&ranges)?;
    Ok(ranges)
}

/// Validate an ordered set of size buckets. Overlaps are allowed; lookup is
/// first-match in list order.
pub fn validate_parcels(ranges: &[ParcelRange]) -> eyre::Result<()> {
    for (i, r) in ranges.iter().enumerate() {
        if r.name.trim().is_empty() {
            eyre::bail!("parcels[{i}].name must not be empty");
        }
        if !r.min_kg.is_finite() || r.min_kg < 0.0 {
            eyre::bail!("parcels[{i}].min_kg must be a finite value >= 0");
        }
        if let Some(max) = r.max_kg {
            if !max.is_finite() {
                eyre::bail!("parcels[{i}].max_kg must be finite");
            }
            if max < r.min_kg {
                eyre::bail!("parcels[{i}].max_kg must be >= min_kg");
            }
            if max == r.min_kg && !(r.min_inclusive && r.max_inclusive) {
                eyre::bail!("parcels[{i}] is empty (min_kg == max_kg without both bounds inclusive)");
            }
        }
    }
    Ok(())
}

fn check_url(key: &str, url: &str) -> eyre::Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        eyre::bail!("endpoints.{key} must be an http(s) URL, got {url:?}");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Endpoints
        let e = &self.endpoints;
        check_url("server", &e.server)?;
        check_url("camera", &e.camera)?;
        check_url("dimensions", &e.dimensions)?;
        check_url("weight", &e.weight)?;
        check_url("manifest", &e.manifest)?;
        check_url("detect_parcel", &e.detect_parcel)?;

        // Detection
        let d = &self.detection;
        if d.poll_interval_ms == 0 {
            eyre::bail!("detection.poll_interval_ms must be >= 1");
        }
        if d.short_timeout_ms == 0 {
            eyre::bail!("detection.short_timeout_ms must be >= 1");
        }
        if d.long_timeout_ms == 0 {
            eyre::bail!("detection.long_timeout_ms must be >= 1");
        }
        if d.long_timeout_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("detection.long_timeout_ms is unreasonably large (>24h)");
        }
        if d.warning_window_ms > d.long_timeout_ms {
            eyre::bail!("detection.warning_window_ms must be <= detection.long_timeout_ms");
        }
        if d.countdown_tick_ms == 0 {
            eyre::bail!("detection.countdown_tick_ms must be >= 1");
        }
        if d.tap_count == 0 {
            eyre::bail!("detection.tap_count must be >= 1");
        }
        if d.tap_window_ms == 0 {
            eyre::bail!("detection.tap_window_ms must be >= 1");
        }
        if !(d.test_weight_kg.is_finite() && d.test_weight_kg > 0.0) {
            eyre::bail!("detection.test_weight_kg must be > 0");
        }

        // Hardware
        if self.hardware.request_timeout_ms == 0 {
            eyre::bail!("hardware.request_timeout_ms must be >= 1");
        }

        // Completion
        if self.completion.tick_ms == 0 {
            eyre::bail!("completion.tick_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        validate_parcels(&self.parcels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().expect("defaults are valid");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = load_toml("").expect("parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn default_buckets_are_ordered_small_to_large() {
        let names: Vec<_> = default_parcels().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["Small Box", "Medium Box", "Large Box", "Extra Large"]
        );
    }
}
