//! Farecast Fare Model
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! farecast-internals/fare-model
//! Loads regression models exported by the training pipeline and evaluates them.
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! {
//!   "kind": "random_forest",
//!   "name": "flight_rf",
//!   "n_features": 3,
//!   "trees": [
//!     { "nodes": [
//!       { "node": "split", "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
//!       { "node": "leaf", "value": 4200.0 },
//!       { "node": "leaf", "value": 6100.0 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! ```json
//! { "kind": "linear", "intercept": 3500.0, "coefficients": [120.0, -4.5, 0.0] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or evaluating a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("model produced a non-finite prediction: {0}")]
    NonFinite(f64),
}

/// A regression model mapping a numeric feature row to a fare
pub trait FareModel: Send + Sync {
    /// Predict the fare for a single feature row
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Input width the model was trained with, when the artifact records it
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Model name, for logs
    fn name(&self) -> &str;
}

/// A serialized model, as written by the export step of the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(ForestRegressor),
    Linear(LinearRegressor),
}

impl ModelArtifact {
    /// Parse and validate an artifact from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse and validate an artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_json(&json)?;
        tracing::info!(
            "Loaded model '{}' from {} ({} features)",
            artifact.name(),
            path.display(),
            artifact
                .n_features()
                .map_or("unknown".to_string(), |n| n.to_string())
        );
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.validate(),
            ModelArtifact::Linear(linear) => linear.validate(),
        }
    }
}

impl FareModel for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.predict(features),
            ModelArtifact::Linear(linear) => linear.predict(features),
        }
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.n_features(),
            ModelArtifact::Linear(linear) => linear.n_features(),
        }
    }

    fn name(&self) -> &str {
        match self {
            ModelArtifact::RandomForest(forest) => forest.name(),
            ModelArtifact::Linear(linear) => linear.name(),
        }
    }
}

/// A node of a flattened regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree, rooted at `nodes[0]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    // Children always sit after their parent, so the walk terminates.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} points to invalid child {} (tree has {} nodes)",
                                idx,
                                child,
                                self.nodes.len()
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", idx));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root, going left when `x[feature] <= threshold`.
    /// A row too short for a split feature, or a tree that never reaches a
    /// leaf, is an error.
    pub fn evaluate(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| ModelError::Invalid(format!("no node at index {}", idx)))?;
            match *node {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(feature).ok_or(ModelError::FeatureCount {
                        expected: feature + 1,
                        actual: features.len(),
                    })?;
                    idx = if *x <= threshold { left } else { right };
                }
            }
        }
        Err(ModelError::Invalid("tree walk did not reach a leaf".into()))
    }
}

/// Random forest regressor: the mean of its trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    #[serde(default)]
    pub name: String,
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Invalid("n_features must be positive".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| ModelError::Invalid(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl FareModel for ForestRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(features)?;
        }
        let prediction = sum / self.trees.len() as f64;
        if !prediction.is_finite() {
            return Err(ModelError::NonFinite(prediction));
        }
        Ok(prediction)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn name(&self) -> &str {
        if self.name.is_empty() {
            "random_forest"
        } else {
            &self.name
        }
    }
}

/// Ordinary linear regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default)]
    pub name: String,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::Invalid("linear model has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "linear model has non-finite parameters".into(),
            ));
        }
        Ok(())
    }
}

impl FareModel for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCount {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let prediction = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        if !prediction.is_finite() {
            return Err(ModelError::NonFinite(prediction));
        }
        Ok(prediction)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn name(&self) -> &str {
        if self.name.is_empty() {
            "linear"
        } else {
            &self.name
        }
    }
}
