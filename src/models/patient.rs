//! Patient request model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::logic::features::{CategoricalField, EncodeError, Field, NumericField, REQUEST_FIELDS};

/// One prediction request: the nine risk attributes of a patient.
///
/// Numeric bounds are declared here and nowhere else. Categorical values are
/// checked against the loaded encoding table by the feature encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PatientData {
    /// Age in years
    #[validate(range(min = 0, max = 120))]
    pub age: i32,

    /// Male or Female
    pub gender: String,

    /// Never, Former or Current
    pub smoking: String,

    /// None, Light, Moderate or Heavy
    pub alcohol_intake: String,

    /// Weekly exercise hours
    #[validate(range(min = 0.0, max = 24.0))]
    pub exercise_hours: f64,

    /// Yes or No
    pub diabetes: String,

    /// Family history of heart disease: Yes or No
    pub family_history: String,

    /// Yes or No
    pub obesity: String,

    /// Self-reported stress on a 1-10 scale
    #[validate(range(min = 1, max = 10))]
    pub stress_level: i32,
}

/// Body that did not decode into a complete `PatientData`
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    /// Decoded fields, with reference values where decoding failed
    pub partial: PatientData,
    /// Missing and wrongly typed fields
    pub errors: Vec<EncodeError>,
}

impl PatientData {
    /// Decode a JSON object field by field, reporting every missing or
    /// wrongly typed field instead of stopping at the first one.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, DecodeFailure> {
        let mut patient = Self::reference();
        let mut errors = Vec::new();

        for field in REQUEST_FIELDS {
            let result = match body.get(field.key()) {
                Some(value) => patient.set(field, value),
                None => Err(EncodeError::Missing { field: field.key() }),
            };
            if let Err(e) = result {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(patient)
        } else {
            Err(DecodeFailure {
                partial: patient,
                errors,
            })
        }
    }

    fn set(&mut self, field: Field, value: &Value) -> Result<(), EncodeError> {
        let invalid = |expected| EncodeError::InvalidType {
            field: field.key(),
            expected,
        };

        match field {
            Field::Numeric(NumericField::Age) => {
                self.age = as_i32(value).ok_or_else(|| invalid("integer"))?;
            }
            Field::Numeric(NumericField::StressLevel) => {
                self.stress_level = as_i32(value).ok_or_else(|| invalid("integer"))?;
            }
            Field::Numeric(NumericField::ExerciseHours) => {
                self.exercise_hours = value.as_f64().ok_or_else(|| invalid("number"))?;
            }
            Field::Categorical(categorical) => {
                let text = value.as_str().ok_or_else(|| invalid("string"))?;
                *self.category_mut(categorical) = text.to_string();
            }
        }

        Ok(())
    }

    /// Reference patient used by the startup self-check and the API docs
    pub fn reference() -> Self {
        Self {
            age: 55,
            gender: "Male".to_string(),
            smoking: "Never".to_string(),
            alcohol_intake: "Moderate".to_string(),
            exercise_hours: 3.5,
            diabetes: "No".to_string(),
            family_history: "Yes".to_string(),
            obesity: "No".to_string(),
            stress_level: 6,
        }
    }

    /// Raw value of a numeric field
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => f64::from(self.age),
            NumericField::ExerciseHours => self.exercise_hours,
            NumericField::StressLevel => f64::from(self.stress_level),
        }
    }

    /// Raw value of a categorical field
    pub fn category(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::Smoking => &self.smoking,
            CategoricalField::AlcoholIntake => &self.alcohol_intake,
            CategoricalField::Diabetes => &self.diabetes,
            CategoricalField::FamilyHistory => &self.family_history,
            CategoricalField::Obesity => &self.obesity,
        }
    }

    pub(crate) fn category_mut(&mut self, field: CategoricalField) -> &mut String {
        match field {
            CategoricalField::Gender => &mut self.gender,
            CategoricalField::Smoking => &mut self.smoking,
            CategoricalField::AlcoholIntake => &mut self.alcohol_intake,
            CategoricalField::Diabetes => &mut self.diabetes,
            CategoricalField::FamilyHistory => &mut self.family_history,
            CategoricalField::Obesity => &mut self.obesity,
        }
    }

    pub fn is_male(&self) -> bool {
        self.gender == "Male"
    }

    pub fn has_diabetes(&self) -> bool {
        self.diabetes == "Yes"
    }

    pub fn has_obesity(&self) -> bool {
        self.obesity == "Yes"
    }

    pub fn has_family_history(&self) -> bool {
        self.family_history == "Yes"
    }
}

fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|v| i32::try_from(v).ok())
}
