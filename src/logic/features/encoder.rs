//! Feature Encoder - PatientData -> EncodedFeatureVector
//!
//! Pure over its inputs and the immutable artifacts. Every range and category
//! problem is reported here, before the model is touched.

use thiserror::Error;
use validator::Validate;

use super::encoding::{EncodingInfo, EncodingTable};
use super::layout::{CategoricalField, Column, ColumnPlan, Field};
use super::scaler::FeatureScaler;
use super::vector::EncodedFeatureVector;
use crate::logic::artifacts::ArtifactError;
use crate::models::PatientData;

/// A problem with one request field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("missing field {field}")]
    Missing { field: &'static str },

    #[error("{field} has the wrong type, expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} = {value} is outside the accepted range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown {field} category '{value}'")]
    UnknownCategory { field: &'static str, value: String },
}

impl EncodeError {
    /// Request key of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::InvalidType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownCategory { field, .. } => field,
        }
    }
}

/// Encoder bound to one loaded artifact set
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    plan: ColumnPlan,
    table: EncodingTable,
    scaler: FeatureScaler,
}

impl FeatureEncoder {
    pub fn new(info: &EncodingInfo, scaler: FeatureScaler) -> Result<Self, ArtifactError> {
        let table = EncodingTable::from_info(info)?;
        scaler.validate(&info.scaler_features)?;
        let plan = ColumnPlan::resolve(&info.features, &info.scaler_features, &table)?;

        Ok(Self { plan, table, scaler })
    }

    pub fn plan(&self) -> &ColumnPlan {
        &self.plan
    }

    pub fn table(&self) -> &EncodingTable {
        &self.table
    }

    /// Number of columns the encoder emits
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Every range and category violation, in request field order
    pub fn violations(&self, input: &PatientData) -> Vec<EncodeError> {
        let mut errors = range_violations(input);

        for field in CategoricalField::ALL {
            let value = input.category(field);
            if !self.table.contains(field, value) {
                errors.push(EncodeError::UnknownCategory {
                    field: field.key(),
                    value: value.to_string(),
                });
            }
        }

        errors.sort_by_key(|e| Field::position(e.field()));
        errors
    }

    pub fn encode(&self, input: &PatientData) -> Result<EncodedFeatureVector, EncodeError> {
        if let Some(first) = self.violations(input).into_iter().next() {
            return Err(first);
        }

        let mut values = Vec::with_capacity(self.plan.len());
        for column in self.plan.columns() {
            let value = match column {
                Column::Numeric(field) => input.numeric(*field),
                Column::Ordinal(field) => {
                    let category = input.category(*field);
                    self.table
                        .code(*field, category)
                        .ok_or_else(|| EncodeError::UnknownCategory {
                            field: field.key(),
                            value: category.to_string(),
                        })?
                }
                Column::Indicator { field, value } => {
                    if input.category(*field) == value {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            values.push(value);
        }

        self.scaler.transform(&mut values, self.plan.scaled());

        Ok(EncodedFeatureVector::new(self.plan.layout_hash(), values))
    }
}

/// Numeric bound violations declared on the request schema
fn range_violations(input: &PatientData) -> Vec<EncodeError> {
    let Err(errors) = input.validate() else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (name, field_errors) in errors.field_errors() {
        let Some(Field::Numeric(field)) = Field::from_name(name.as_ref()) else {
            continue;
        };

        for error in field_errors.iter() {
            let bound = |key: &str| {
                error
                    .params
                    .get(key)
                    .and_then(|v| v.as_f64())
                    .unwrap_or(f64::NAN)
            };

            violations.push(EncodeError::OutOfRange {
                field: field.key(),
                value: input.numeric(field),
                min: bound("min"),
                max: bound("max"),
            });
        }
    }

    violations
}
