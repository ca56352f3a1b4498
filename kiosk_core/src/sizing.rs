//! Parcel size buckets.

/// One named weight bucket.
///
/// `max_kg == None` means unbounded above.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelSizeRange {
    pub name: String,
    pub min_kg: f64,
    pub max_kg: Option<f64>,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl ParcelSizeRange {
    /// Bucket with the usual `(min, max]` bounds.
    pub fn new(name: impl Into<String>, min_kg: f64, max_kg: Option<f64>) -> Self {
        Self {
            name: name.into(),
            min_kg,
            max_kg,
            min_inclusive: false,
            max_inclusive: true,
        }
    }

    pub fn with_bounds(mut self, min_inclusive: bool, max_inclusive: bool) -> Self {
        self.min_inclusive = min_inclusive;
        self.max_inclusive = max_inclusive;
        self
    }

    pub fn contains(&self, weight_kg: f64) -> bool {
        if !weight_kg.is_finite() {
            return false;
        }
        let above_min = if self.min_inclusive {
            weight_kg >= self.min_kg
        } else {
            weight_kg > self.min_kg
        };
        let below_max = match self.max_kg {
            None => true,
            Some(max) if self.max_inclusive => weight_kg <= max,
            Some(max) => weight_kg < max,
        };
        above_min && below_max
    }
}

/// First bucket (in list order) containing `weight_kg`.
pub fn size_for_weight(ranges: &[ParcelSizeRange], weight_kg: f64) -> Option<&ParcelSizeRange> {
    ranges.iter().find(|r| r.contains(weight_kg))
}
