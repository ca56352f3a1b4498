//! Scale reading normalization and weight-change tracking.

/// Round a raw scale reading (kg) up to the next 0.1 kg.
///
/// Products within a few ULPs of a whole tenth snap to it, so `0.7`
/// (scaled to `7.000000000000001`) stays `0.7`. Anything measurably above a
/// tenth rounds up.
#[inline]
pub fn round_up_tenth(raw_kg: f64) -> f64 {
    let scaled = raw_kg * 10.0;
    let nearest = scaled.round();
    let tenths = if (scaled - nearest).abs() <= nearest.abs() * f64::EPSILON * 4.0 {
        nearest
    } else {
        scaled.ceil()
    };
    tenths / 10.0
}

/// One usable (positive, finite) scale reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSample {
    /// Reading as reported by the scale.
    pub raw_kg: f64,
    /// Reading rounded up to 0.1 kg; used for change detection.
    pub rounded_kg: f64,
}

impl WeightSample {
    pub fn new(raw_kg: f64) -> Self {
        Self {
            raw_kg,
            rounded_kg: round_up_tenth(raw_kg),
        }
    }
}

/// What a poll result means relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightObservation {
    /// Nothing on the scale (absent, zero, negative or non-finite reading).
    Empty,
    /// First usable reading since the screen opened; nothing to compare with.
    First(WeightSample),
    /// Same rounded weight as last time.
    Unchanged(WeightSample),
    /// Rounded weight differs from the previous observation.
    Changed { previous_kg: f64, sample: WeightSample },
}

impl WeightObservation {
    pub fn sample(&self) -> Option<WeightSample> {
        match *self {
            WeightObservation::Empty => None,
            WeightObservation::First(s) | WeightObservation::Unchanged(s) => Some(s),
            WeightObservation::Changed { sample, .. } => Some(sample),
        }
    }
}

/// Keeps the last observed rounded weight.
///
/// Starts unset. An empty scale records `0.0`, so putting a parcel on an
/// empty scale is a change.
#[derive(Debug, Clone, Default)]
pub struct WeightTracker {
    last_kg: Option<f64>,
}

impl WeightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, reading: Option<f64>) -> WeightObservation {
        let Some(raw) = reading.filter(|w| w.is_finite() && *w > 0.0) else {
            self.last_kg = Some(0.0);
            return WeightObservation::Empty;
        };
        let sample = WeightSample::new(raw);
        match self.last_kg.replace(sample.rounded_kg) {
            None => WeightObservation::First(sample),
            Some(prev) if (prev - sample.rounded_kg).abs() > 1e-9 => WeightObservation::Changed {
                previous_kg: prev,
                sample,
            },
            Some(_) => WeightObservation::Unchanged(sample),
        }
    }

    /// Last observed rounded weight; `None` until the first poll result.
    pub fn last_observed_kg(&self) -> Option<f64> {
        self.last_kg
    }
}
