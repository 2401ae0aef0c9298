use crate::constants::{FEATURE_COUNT, TRAINING_COLUMNS};
use crate::error::{PredictorError, Result};
use crate::model::features::FeatureVector;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// On-disk shape of a fitted binary logistic regression
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    coefficients: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default = "default_classes")]
    classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Pre-trained binary classifier, immutable once loaded
#[derive(Debug, Clone)]
pub struct LogisticModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    classes: [i64; 2],
    fingerprint: String,
}

impl LogisticModel {
    /// Read and validate a model artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            PredictorError::InvalidModel(format!(
                "failed to read model file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let model = Self::from_slice(&bytes)?;
        info!(
            "Loaded model from {} (fingerprint {})",
            path.display(),
            model.fingerprint
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        let fingerprint = hex::encode(Sha256::digest(bytes));

        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(TRAINING_COLUMNS.iter().copied()) {
                return Err(PredictorError::InvalidModel(format!(
                    "feature_names {:?} do not match training schema {:?}",
                    names, TRAINING_COLUMNS
                )));
            }
        }

        let row = match artifact.coefficients.as_slice() {
            [row] => row,
            rows => {
                return Err(PredictorError::InvalidModel(format!(
                    "expected exactly one coefficient row, got {}",
                    rows.len()
                )))
            }
        };
        let coefficients: [f64; FEATURE_COUNT] = row.as_slice().try_into().map_err(|_| {
            PredictorError::InvalidModel(format!(
                "expected {} coefficients, got {}",
                FEATURE_COUNT,
                row.len()
            ))
        })?;

        let intercept = match artifact.intercept.as_slice() {
            [b] => *b,
            other => {
                return Err(PredictorError::InvalidModel(format!(
                    "expected exactly one intercept, got {}",
                    other.len()
                )))
            }
        };

        let classes = match artifact.classes.as_slice() {
            [neg, pos] if neg != pos => [*neg, *pos],
            other => {
                return Err(PredictorError::InvalidModel(format!(
                    "expected two distinct class labels, got {:?}",
                    other
                )))
            }
        };

        if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
            return Err(PredictorError::InvalidModel(
                "coefficients and intercept must be finite".to_string(),
            ));
        }

        debug!(
            "Model parameters: coefficients={:?} intercept={} classes={:?}",
            coefficients, intercept, classes
        );

        Ok(Self {
            coefficients,
            intercept,
            classes,
            fingerprint,
        })
    }

    /// Signed distance from the decision boundary (`w·x + b`)
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.coefficients) + self.intercept
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Predicted class label. A sample exactly on the boundary is negative.
    pub fn predict(&self, features: &FeatureVector) -> i64 {
        if self.decision_function(features) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }

    pub fn predict_batch(&self, samples: &[FeatureVector]) -> Vec<i64> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    pub fn positive_class(&self) -> i64 {
        self.classes[1]
    }

    /// SHA-256 of the artifact bytes the model was parsed from
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
