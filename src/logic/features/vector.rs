//! Encoded Feature Vector - model input
//!
//! Built fresh per request by the encoder. Carries the layout hash of the
//! column plan that produced it so a vector can never be scored against a
//! different layout unnoticed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector {
    /// CRC32 of the column plan
    pub layout_hash: u32,
    /// Values in column plan order, already scaled
    pub values: Vec<f64>,
}

impl EncodedFeatureVector {
    pub fn new(layout_hash: u32, values: Vec<f64>) -> Self {
        Self { layout_hash, values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Named values for debug logging
    pub fn to_log_entry(&self, names: &[String]) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": format!("{:08x}", self.layout_hash),
            "named_values": names.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), serde_json::json!(value)))
                .collect::<serde_json::Map<String, serde_json::Value>>(),
        })
    }
}
