//! Wire formats of the weight and classification services.

use serde::Deserialize;

use crate::error::{HwError, Result};

/// `{ "data": { "weight": number } }`; both levels may be missing or null.
#[derive(Debug, Deserialize)]
struct WeightResponse {
    #[serde(default)]
    data: Option<WeightData>,
}

#[derive(Debug, Deserialize)]
struct WeightData {
    #[serde(default)]
    weight: Option<f64>,
}

/// `{ "is_box": boolean }`
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    is_box: bool,
}

pub fn parse_weight_body(body: &str) -> Result<Option<f64>> {
    let resp: WeightResponse =
        serde_json::from_str(body).map_err(|e| HwError::Decode(e.to_string()))?;
    Ok(resp.data.and_then(|d| d.weight))
}

pub fn parse_classification_body(body: &str) -> Result<bool> {
    let resp: ClassifyResponse =
        serde_json::from_str(body).map_err(|e| HwError::Decode(e.to_string()))?;
    Ok(resp.is_box)
}
