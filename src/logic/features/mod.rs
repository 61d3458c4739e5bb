//! Features Module - Feature Encoding Engine
//!
//! Turns a validated request into the exact column layout the forest was
//! trained on. The layout is read from the encoding artifact.

pub mod layout;
pub mod encoding;
pub mod scaler;
pub mod encoder;
pub mod vector;

// Re-export common types
pub use layout::{
    CategoricalField, Column, ColumnPlan, Field, LayoutInfo, NumericField, REQUEST_FIELDS,
};
pub use encoding::{EncodingInfo, EncodingTable};
pub use scaler::FeatureScaler;
pub use encoder::{EncodeError, FeatureEncoder};
pub use vector::EncodedFeatureVector;
