//! Random Forest - frozen decision-tree ensemble
//!
//! Trees are stored in the flat array layout scikit-learn exports
//! (`children_left`, `children_right`, `feature`, `threshold`, `value`).
//! A node is a leaf when `children_left == -1`.

use serde::{Deserialize, Serialize};

use super::inference::{InferenceError, RiskModel};
use crate::logic::artifacts::ArtifactError;

const LEAF: i64 = -1;

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// On-disk layout of `cardiovascular_risk_model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub n_features: usize,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts or fractions
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        positive: f64,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_arrays(
        arrays: &TreeArrays,
        n_features: usize,
        positive_class: usize,
        tree_index: usize,
    ) -> Result<Self, ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            artifact: "model",
            reason: format!("tree {}: {}", tree_index, reason),
        };

        let n = arrays.children_left.len();
        if n == 0 {
            return Err(invalid("no nodes".to_string()));
        }
        if arrays.children_right.len() != n
            || arrays.feature.len() != n
            || arrays.threshold.len() != n
            || arrays.value.len() != n
        {
            return Err(invalid("node arrays have different lengths".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = arrays.children_left[i];
            let right = arrays.children_right[i];

            if left == LEAF {
                let value = &arrays.value[i];
                if value.len() != 2 {
                    return Err(invalid(format!("leaf {} has {} class values", i, value.len())));
                }
                let total: f64 = value.iter().sum();
                if !total.is_finite() || total <= 0.0 || value.iter().any(|v| *v < 0.0) {
                    return Err(invalid(format!("leaf {} has invalid class values {:?}", i, value)));
                }
                nodes.push(Node::Leaf {
                    positive: value[positive_class] / total,
                });
                continue;
            }

            // Children always come after their parent, so traversal terminates
            let child = |c: i64| -> Result<usize, ArtifactError> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| invalid(format!("node {} has invalid child {}", i, c)))
            };
            let feature = usize::try_from(arrays.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    invalid(format!("node {} splits on feature {}", i, arrays.feature[i]))
                })?;
            let threshold = arrays.threshold[i];
            if !threshold.is_finite() {
                return Err(invalid(format!("node {} has non-finite threshold", i)));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    /// Positive-class fraction of the leaf the sample lands in
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees were fitted on float32 inputs
                    let value = features[*feature] as f32 as f64;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn from_artifact(artifact: &ForestArtifact) -> Result<Self, ArtifactError> {
        if artifact.n_features == 0 {
            return Err(ArtifactError::Invalid {
                artifact: "model",
                reason: "n_features is zero".to_string(),
            });
        }
        if artifact.trees.is_empty() {
            return Err(ArtifactError::Invalid {
                artifact: "model",
                reason: "forest has no trees".to_string(),
            });
        }
        if artifact.classes.len() != 2 {
            return Err(ArtifactError::Invalid {
                artifact: "model",
                reason: format!("expected a binary classifier, got classes {:?}", artifact.classes),
            });
        }
        let positive_class = artifact
            .classes
            .iter()
            .position(|&c| c == 1)
            .ok_or_else(|| ArtifactError::Invalid {
                artifact: "model",
                reason: format!("positive class 1 missing from {:?}", artifact.classes),
            })?;

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| DecisionTree::from_arrays(t, artifact.n_features, positive_class, i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            n_features: artifact.n_features,
            trees,
        })
    }
}

impl RiskModel for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn tree_probabilities(&self, features: &[f64]) -> Option<Vec<f64>> {
        if features.len() != self.n_features {
            return None;
        }
        Some(self.trees.iter().map(|t| t.predict(features)).collect())
    }
}
