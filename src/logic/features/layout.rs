//! Feature Layout - Request fields and the artifact column plan
//!
//! The column order used when the scaler and the forest were fitted lives in
//! the encoding artifact, not in this file. The plan below is derived from it
//! at load time and is the only thing the encoder trusts.
//!
//! ## Column kinds
//! - numeric field name (`Age`)           -> raw value passes through
//! - categorical field name (`Smoking`)   -> ordinal code from the table
//! - `<Field>_<Value>` (`Smoking_Current`) -> one-hot indicator

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::encoding::EncodingTable;
use crate::logic::artifacts::ArtifactError;

// ============================================================================
// REQUEST FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericField {
    Age,
    ExerciseHours,
    StressLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoricalField {
    Gender,
    Smoking,
    AlcoholIntake,
    Diabetes,
    FamilyHistory,
    Obesity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Numeric(NumericField),
    Categorical(CategoricalField),
}

/// Request fields in payload order
pub const REQUEST_FIELDS: [Field; 9] = [
    Field::Numeric(NumericField::Age),
    Field::Categorical(CategoricalField::Gender),
    Field::Categorical(CategoricalField::Smoking),
    Field::Categorical(CategoricalField::AlcoholIntake),
    Field::Numeric(NumericField::ExerciseHours),
    Field::Categorical(CategoricalField::Diabetes),
    Field::Categorical(CategoricalField::FamilyHistory),
    Field::Categorical(CategoricalField::Obesity),
    Field::Numeric(NumericField::StressLevel),
];

impl NumericField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::ExerciseHours => "exercise_hours",
            Self::StressLevel => "stress_level",
        }
    }

    /// Column name used in the training data
    pub fn display(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::ExerciseHours => "Exercise Hours",
            Self::StressLevel => "Stress Level",
        }
    }
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        Self::Gender,
        Self::Smoking,
        Self::AlcoholIntake,
        Self::Diabetes,
        Self::FamilyHistory,
        Self::Obesity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Smoking => "smoking",
            Self::AlcoholIntake => "alcohol_intake",
            Self::Diabetes => "diabetes",
            Self::FamilyHistory => "family_history",
            Self::Obesity => "obesity",
        }
    }

    /// Column name used in the training data
    pub fn display(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Smoking => "Smoking",
            Self::AlcoholIntake => "Alcohol Intake",
            Self::Diabetes => "Diabetes",
            Self::FamilyHistory => "Family History",
            Self::Obesity => "Obesity",
        }
    }

    /// Categories the request schema documents for this field
    pub fn expected_categories(self) -> &'static [&'static str] {
        match self {
            Self::Gender => &["Male", "Female"],
            Self::Smoking => &["Never", "Former", "Current"],
            Self::AlcoholIntake => &["None", "Light", "Moderate", "Heavy"],
            Self::Diabetes | Self::FamilyHistory | Self::Obesity => &["Yes", "No"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.display() == name || f.key() == name)
    }
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Self::Numeric(f) => f.key(),
            Self::Categorical(f) => f.key(),
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            Self::Numeric(f) => f.display(),
            Self::Categorical(f) => f.display(),
        }
    }

    /// Accepts either the training column name or the request key
    pub fn from_name(name: &str) -> Option<Self> {
        REQUEST_FIELDS
            .into_iter()
            .find(|f| f.display() == name || f.key() == name)
    }

    /// Position in the request payload, used to order error reports
    pub fn position(key: &str) -> usize {
        REQUEST_FIELDS
            .iter()
            .position(|f| f.key() == key)
            .unwrap_or(REQUEST_FIELDS.len())
    }
}

// ============================================================================
// COLUMN PLAN
// ============================================================================

/// How one column of the feature vector is produced
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(NumericField),
    Ordinal(CategoricalField),
    Indicator {
        field: CategoricalField,
        value: String,
    },
}

impl Column {
    /// Resolve an artifact column name against the request schema
    fn resolve(name: &str, table: &EncodingTable) -> Result<Self, ArtifactError> {
        match Field::from_name(name) {
            Some(Field::Numeric(f)) => return Ok(Self::Numeric(f)),
            Some(Field::Categorical(f)) => return Ok(Self::Ordinal(f)),
            None => {}
        }

        for field in CategoricalField::ALL {
            for prefix in [field.display(), field.key()] {
                let Some(value) = name
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('_'))
                else {
                    continue;
                };

                if !table.contains(field, value) {
                    return Err(ArtifactError::SchemaMismatch(format!(
                        "column '{}' refers to category '{}' missing from the {} encoding",
                        name,
                        value,
                        field.display()
                    )));
                }

                return Ok(Self::Indicator {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Err(ArtifactError::SchemaMismatch(format!(
            "column '{}' does not match any request field",
            name
        )))
    }
}

/// Ordered column instructions plus the indices the scaler applies to
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    columns: Vec<Column>,
    names: Vec<String>,
    scaled: Vec<usize>,
    hash: u32,
}

impl ColumnPlan {
    /// Build the plan from the artifact's column list and scaled-column list
    pub fn resolve(
        features: &[String],
        scaler_features: &[String],
        table: &EncodingTable,
    ) -> Result<Self, ArtifactError> {
        if features.is_empty() {
            return Err(ArtifactError::SchemaMismatch(
                "encoding artifact lists no feature columns".to_string(),
            ));
        }

        let columns = features
            .iter()
            .map(|name| Column::resolve(name, table))
            .collect::<Result<Vec<_>, _>>()?;

        for field in REQUEST_FIELDS {
            let covered = columns.iter().any(|c| match (c, field) {
                (Column::Numeric(a), Field::Numeric(b)) => *a == b,
                (Column::Ordinal(a), Field::Categorical(b)) => *a == b,
                (Column::Indicator { field: a, .. }, Field::Categorical(b)) => *a == b,
                _ => false,
            });
            if !covered {
                tracing::warn!("Request field '{}' is not used by any model column", field.key());
            }
        }

        let mut scaled = Vec::with_capacity(scaler_features.len());
        for name in scaler_features {
            let index = features.iter().position(|f| f == name).ok_or_else(|| {
                ArtifactError::SchemaMismatch(format!(
                    "scaled column '{}' is not in the feature list",
                    name
                ))
            })?;
            scaled.push(index);
        }

        let hash = compute_layout_hash(features, scaler_features);

        Ok(Self {
            columns,
            names: features.to_vec(),
            scaled,
            hash,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column indices in scaler parameter order
    pub fn scaled(&self) -> &[usize] {
        &self.scaled
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn layout_hash(&self) -> u32 {
        self.hash
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the ordered column names and scaled-column names.
/// Two plans with the same hash produce identically laid out vectors.
pub fn compute_layout_hash(features: &[String], scaler_features: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    for name in features {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.update(&[0xff]);
    for name in scaler_features {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout summary for the metadata endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: String,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub scaled_features: Vec<String>,
}

impl From<&ColumnPlan> for LayoutInfo {
    fn from(plan: &ColumnPlan) -> Self {
        Self {
            hash: format!("{:08x}", plan.hash),
            feature_count: plan.len(),
            feature_names: plan.names.clone(),
            scaled_features: plan.scaled.iter().map(|&i| plan.names[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ordinal_columns, sample_encoding_info};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> EncodingTable {
        EncodingTable::from_info(&sample_encoding_info()).unwrap()
    }

    #[test]
    fn test_field_lookup_accepts_both_spellings() {
        assert_eq!(
            Field::from_name("Family History"),
            Some(Field::Categorical(CategoricalField::FamilyHistory))
        );
        assert_eq!(
            Field::from_name("family_history"),
            Some(Field::Categorical(CategoricalField::FamilyHistory))
        );
        assert_eq!(
            Field::from_name("Exercise Hours"),
            Some(Field::Numeric(NumericField::ExerciseHours))
        );
        assert_eq!(Field::from_name("cholesterol"), None);
    }

    #[test]
    fn test_ordinal_plan() {
        let plan = ColumnPlan::resolve(
            &ordinal_columns(),
            &names(&["Age", "Exercise Hours", "Stress Level"]),
            &table(),
        )
        .unwrap();

        assert_eq!(plan.len(), 9);
        assert_eq!(plan.columns()[0], Column::Numeric(NumericField::Age));
        assert_eq!(plan.columns()[6], Column::Ordinal(CategoricalField::FamilyHistory));
        assert_eq!(plan.scaled(), &[0, 4, 8]);
    }

    #[test]
    fn test_one_hot_plan() {
        let features = names(&[
            "Age",
            "Gender_Male",
            "Smoking_Current",
            "Smoking_Former",
            "alcohol_intake_Heavy",
            "Exercise Hours",
            "Diabetes",
            "Family History_Yes",
            "Obesity",
            "Stress Level",
        ]);
        let plan = ColumnPlan::resolve(&features, &names(&["Age"]), &table()).unwrap();

        assert_eq!(plan.len(), 10);
        assert_eq!(
            plan.columns()[4],
            Column::Indicator {
                field: CategoricalField::AlcoholIntake,
                value: "Heavy".to_string(),
            }
        );
        assert_eq!(
            plan.columns()[7],
            Column::Indicator {
                field: CategoricalField::FamilyHistory,
                value: "Yes".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_column_is_schema_mismatch() {
        let err = ColumnPlan::resolve(&names(&["Age", "Cholesterol"]), &[], &table()).unwrap_err();
        assert!(matches!(err, ArtifactError::SchemaMismatch(_)));
    }

    #[test]
    fn test_indicator_for_unknown_category_is_schema_mismatch() {
        let err = ColumnPlan::resolve(&names(&["Smoking_Sometimes"]), &[], &table()).unwrap_err();
        assert!(matches!(err, ArtifactError::SchemaMismatch(_)));
    }

    #[test]
    fn test_scaled_column_must_exist() {
        let err = ColumnPlan::resolve(&ordinal_columns(), &names(&["BMI"]), &table()).unwrap_err();
        assert!(matches!(err, ArtifactError::SchemaMismatch(_)));
    }

    #[test]
    fn test_layout_hash_tracks_order() {
        let a = compute_layout_hash(&names(&["Age", "Gender"]), &names(&["Age"]));
        let b = compute_layout_hash(&names(&["Gender", "Age"]), &names(&["Age"]));
        let c = compute_layout_hash(&names(&["Age", "Gender"]), &[]);
        assert_eq!(a, compute_layout_hash(&names(&["Age", "Gender"]), &names(&["Age"])));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
