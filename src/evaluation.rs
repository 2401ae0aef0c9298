//! Scoring the model against the evaluation slice and ranking its features.

use crate::constants::DISPLAY_NAMES;
use crate::dataset::EvaluationSlice;
use crate::error::{PredictorError, Result};
use crate::model::LogisticModel;
use serde::Serialize;

/// Binary confusion matrix with fixed labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Count outcomes, treating `positive_label` as positive and everything else as negative.
    /// A slice containing a single class still yields all four cells.
    pub fn compute(y_true: &[i64], y_pred: &[i64], positive_label: i64) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PredictorError::InvalidDataset {
                row: y_true.len().min(y_pred.len()) + 1,
                message: format!(
                    "label count {} does not match prediction count {}",
                    y_true.len(),
                    y_pred.len()
                ),
            });
        }

        let mut cm = Self::default();
        for (&actual, &predicted) in y_true.iter().zip(y_pred) {
            match (actual == positive_label, predicted == positive_label) {
                (true, true) => cm.true_positives += 1,
                (false, false) => cm.true_negatives += 1,
                (false, true) => cm.false_positives += 1,
                (true, false) => cm.false_negatives += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// JSON body of `GET /performance`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PerformanceReport {
    #[serde(rename = "TP")]
    pub tp: u64,
    #[serde(rename = "TN")]
    pub tn: u64,
    #[serde(rename = "FP")]
    pub fp: u64,
    #[serde(rename = "FN")]
    pub fn_: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub samples: u64,
}

impl From<ConfusionMatrix> for PerformanceReport {
    fn from(cm: ConfusionMatrix) -> Self {
        Self {
            tp: cm.true_positives,
            tn: cm.true_negatives,
            fp: cm.false_positives,
            fn_: cm.false_negatives,
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            samples: cm.total(),
        }
    }
}

/// Run the model over every row of the slice
pub fn evaluate(model: &LogisticModel, slice: &EvaluationSlice) -> Result<ConfusionMatrix> {
    let predictions = model.predict_batch(slice.features());
    ConfusionMatrix::compute(slice.labels(), &predictions, model.positive_class())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureImportance {
    pub name: &'static str,
    pub value: f64,
}

/// Absolute coefficient per feature, largest first. Equal magnitudes keep schema order.
pub fn feature_importance(model: &LogisticModel) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = DISPLAY_NAMES
        .iter()
        .zip(model.coefficients().iter())
        .map(|(&name, coef)| FeatureImportance {
            name,
            value: coef.abs(),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureVector;

    #[test]
    fn test_confusion_counts() {
        let y_true = [1, 0, 1, 1, 0, 0];
        let y_pred = [1, 0, 0, 1, 1, 0];
        let cm = ConfusionMatrix::compute(&y_true, &y_pred, 1).unwrap();
        assert_eq!(cm.true_positives, 2);
        assert_eq!(cm.true_negatives, 2);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.false_negatives, 1);
        assert_eq!(cm.total(), 6);
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-12);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.f1() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_still_has_four_cells() {
        let cm = ConfusionMatrix::compute(&[0, 0, 0], &[0, 0, 0], 1).unwrap();
        assert_eq!(
            cm,
            ConfusionMatrix {
                true_positives: 0,
                true_negatives: 3,
                false_positives: 0,
                false_negatives: 0,
            }
        );
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ConfusionMatrix::compute(&[1, 0], &[1], 1).is_err());
    }

    #[test]
    fn test_report_keys() {
        let cm = ConfusionMatrix {
            true_positives: 5,
            true_negatives: 4,
            false_positives: 1,
            false_negatives: 0,
        };
        let json = serde_json::to_value(PerformanceReport::from(cm)).unwrap();
        assert_eq!(json["TP"], 5);
        assert_eq!(json["TN"], 4);
        assert_eq!(json["FP"], 1);
        assert_eq!(json["FN"], 0);
        assert_eq!(json["samples"], 10);
        assert_eq!(json["accuracy"], 0.9);
    }

    #[test]
    fn test_importance_sorted_by_magnitude() {
        let model = LogisticModel::from_json(
            r#"{"coefficients": [[-0.02, 0.1, 1.5, -0.4, 0.4]], "intercept": [-0.5]}"#,
        )
        .unwrap();
        let ranked = feature_importance(&model);
        let names: Vec<&str> = ranked.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["loyalty", "discounts", "discounts x loyalty", "purchases", "age"]
        );
        assert_eq!(ranked[1].value, 0.4);
        assert!(ranked.iter().all(|f| f.value >= 0.0));
    }

    #[test]
    fn test_evaluate_against_slice() {
        let model = LogisticModel::from_json(
            r#"{"coefficients": [[0, 0, 1, 0, 0]], "intercept": [-0.5]}"#,
        )
        .unwrap();
        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,1,1
30,2,0,1,1
30,2,1,1,0
30,2,0,1,0
";
        let slice = EvaluationSlice::from_reader(csv.as_bytes(), 1500).unwrap();
        let cm = evaluate(&model, &slice).unwrap();
        assert_eq!(cm.true_positives, 1);
        assert_eq!(cm.false_negatives, 1);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.true_negatives, 1);

        assert_eq!(model.predict(&FeatureVector::from_raw(30.0, 2.0, 1.0, 1.0)), 1);
    }
}
