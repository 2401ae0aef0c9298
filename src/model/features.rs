use crate::constants::FEATURE_COUNT;
use crate::error::{PredictorError, Result};
use serde::Serialize;

/// One sample in the model's training-time feature order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector from the four raw customer attributes, deriving the
    /// loyalty x discounts interaction term.
    pub fn from_raw(age: f64, purchases: f64, loyalty: f64, discounts: f64) -> Self {
        Self([age, purchases, loyalty, discounts, loyalty * discounts])
    }

    /// Build a vector from client-supplied values.
    ///
    /// Five values are taken as-is (the caller supplies the interaction term).
    /// Four values get the interaction term derived.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(PredictorError::InvalidFeatures(format!(
                "value at index {} is not a finite number",
                pos
            )));
        }

        match values {
            [age, purchases, loyalty, discounts] => {
                Ok(Self::from_raw(*age, *purchases, *loyalty, *discounts))
            }
            [a, b, c, d, e] => Ok(Self([*a, *b, *c, *d, *e])),
            other => Err(PredictorError::InvalidFeatures(format!(
                "expected {} or {} values, got {}",
                FEATURE_COUNT - 1,
                FEATURE_COUNT,
                other.len()
            ))),
        }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Dot product with a coefficient row
    pub fn dot(&self, weights: &[f64; FEATURE_COUNT]) -> f64 {
        self.0.iter().zip(weights.iter()).map(|(x, w)| x * w).sum()
    }
}
