//! Service metadata handler

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::artifacts::ModelSummary;
use crate::logic::features::{CategoricalField, REQUEST_FIELDS};
use crate::logic::model::RiskLevel;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub cors: &'static str,
    pub features: Vec<&'static str>,
    pub categories: BTreeMap<&'static str, Vec<String>>,
    pub risk_labels: Vec<&'static str>,
    pub clinical_adjustment: bool,
    pub model: ModelSummary,
    pub endpoints: Vec<&'static str>,
}

pub async fn index(State(state): State<AppState>) -> Json<ServiceInfo> {
    let artifacts = state.predictor.artifacts();
    let table = artifacts.encoder().table();

    let categories = CategoricalField::ALL
        .into_iter()
        .map(|field| {
            let accepted = table.categories(field).into_iter().map(str::to_string).collect();
            (field.key(), accepted)
        })
        .collect();

    Json(ServiceInfo {
        name: APP_NAME,
        version: APP_VERSION,
        environment: state.config.environment.clone(),
        cors: if state.config.allow_all_origins() { "any" } else { "restricted" },
        features: REQUEST_FIELDS.iter().map(|f| f.key()).collect(),
        categories,
        risk_labels: RiskLevel::ALL.iter().map(|level| level.label()).collect(),
        clinical_adjustment: state.predictor.clinical_adjustment(),
        model: artifacts.summary(),
        endpoints: vec!["GET /", "GET /health", "POST /predict"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_state;

    #[test]
    fn test_index_lists_request_fields() {
        let Json(info) = tokio_test::block_on(index(State(sample_state())));
        assert_eq!(info.features.len(), 9);
        assert_eq!(info.features[0], "age");
        assert_eq!(info.categories["gender"], vec!["Female", "Male"]);
        assert_eq!(info.risk_labels, vec!["Low Risk", "Moderate Risk", "High Risk"]);
        assert_eq!(info.model.n_features, 9);
        assert_eq!(info.cors, "any");
    }
}
