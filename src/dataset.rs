use crate::constants::{
    AGE_COLUMN, DISCOUNTS_COLUMN, LOYALTY_COLUMN, PURCHASES_COLUMN, REQUIRED_DATASET_COLUMNS,
};
use crate::error::{PredictorError, Result};
use crate::model::FeatureVector;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One customer row from the purchase dataset. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CustomerRecord {
    #[serde(rename = "Age")]
    age: f64,
    #[serde(rename = "NumberOfPurchases")]
    number_of_purchases: f64,
    #[serde(rename = "LoyaltyProgram")]
    loyalty_program: f64,
    #[serde(rename = "DiscountsAvailed")]
    discounts_availed: f64,
    #[serde(rename = "PurchaseStatus")]
    purchase_status: i64,
}

/// Held-out rows used to score the model, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct EvaluationSlice {
    features: Vec<FeatureVector>,
    labels: Vec<i64>,
}

impl EvaluationSlice {
    /// Load the first `max_rows` data rows of the CSV at `path`
    pub fn load(path: impl AsRef<Path>, max_rows: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PredictorError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to open dataset '{}': {}", path.display(), e),
            ))
        })?;
        let slice = Self::from_reader(file, max_rows)?;
        info!(
            "Loaded evaluation slice of {} rows from {}",
            slice.len(),
            path.display()
        );
        Ok(slice)
    }

    pub fn from_reader<R: Read>(reader: R, max_rows: usize) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_DATASET_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(PredictorError::MissingColumn(column.to_string()));
            }
        }

        let mut slice = Self::default();
        for (idx, record) in reader
            .deserialize::<CustomerRecord>()
            .take(max_rows)
            .enumerate()
        {
            let row = idx + 1;
            let record = record.map_err(|e| PredictorError::InvalidDataset {
                row,
                message: e.to_string(),
            })?;

            if record.purchase_status != 0 && record.purchase_status != 1 {
                return Err(PredictorError::InvalidDataset {
                    row,
                    message: format!(
                        "PurchaseStatus must be 0 or 1, got {}",
                        record.purchase_status
                    ),
                });
            }

            let raw = [
                (AGE_COLUMN, record.age),
                (PURCHASES_COLUMN, record.number_of_purchases),
                (LOYALTY_COLUMN, record.loyalty_program),
                (DISCOUNTS_COLUMN, record.discounts_availed),
            ];
            if let Some((column, value)) = raw.iter().find(|(_, v)| !v.is_finite()) {
                return Err(PredictorError::InvalidDataset {
                    row,
                    message: format!("{} must be a finite number, got {}", column, value),
                });
            }

            slice.features.push(FeatureVector::from_raw(
                record.age,
                record.number_of_purchases,
                record.loyalty_program,
                record.discounts_availed,
            ));
            slice.labels.push(record.purchase_status);
        }

        if slice.is_empty() {
            warn!("Evaluation slice is empty; performance counts will all be zero");
        }

        Ok(slice)
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Age,Gender,AnnualIncome,NumberOfPurchases,ProductCategory,TimeSpentOnWebsite,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
40,1,66120.27,8,0,30.57,0,5,1
20,1,23579.77,4,2,38.24,0,5,0
27,1,127821.30,11,2,31.63,1,0,1
24,1,137798.62,19,3,46.17,1,4,1
";

    #[test]
    fn test_loads_rows_and_derives_interaction() {
        let slice = EvaluationSlice::from_reader(CSV.as_bytes(), 1500).unwrap();
        assert_eq!(slice.len(), 4);
        assert_eq!(slice.labels(), &[1, 0, 1, 1]);
        assert_eq!(slice.features()[0].values(), &[40.0, 8.0, 0.0, 5.0, 0.0]);
        assert_eq!(slice.features()[3].values(), &[24.0, 19.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_takes_only_leading_rows() {
        let slice = EvaluationSlice::from_reader(CSV.as_bytes(), 2).unwrap();
        assert_eq!(slice.len(), 2);
        assert_eq!(slice.labels(), &[1, 0]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Age,NumberOfPurchases,LoyaltyProgram,PurchaseStatus\n30,2,1,1\n";
        let err = EvaluationSlice::from_reader(csv.as_bytes(), 10).unwrap_err();
        assert!(matches!(err, PredictorError::MissingColumn(ref c) if c == "DiscountsAvailed"));
    }

    #[test]
    fn test_bad_value_names_row() {
        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,1,1
thirty,2,1,1,0
";
        let err = EvaluationSlice::from_reader(csv.as_bytes(), 10).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidDataset { row: 2, .. }));
    }

    #[test]
    fn test_nan_and_infinite_values_rejected() {
        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,1,1
NaN,2,1,inf,1
";
        let err = EvaluationSlice::from_reader(csv.as_bytes(), 10).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidDataset { row: 2, .. }));
        assert!(err.to_string().contains("Age must be a finite number"));

        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,inf,1
";
        let err = EvaluationSlice::from_reader(csv.as_bytes(), 10).unwrap_err();
        assert!(err.to_string().contains("DiscountsAvailed"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EvaluationSlice::load("/no/such/dataset.csv", 10).unwrap_err();
        assert!(matches!(err, PredictorError::Io(_)));
        assert!(err.to_string().contains("failed to open dataset"));
    }

    #[test]
    fn test_bad_row_past_limit_is_ignored() {
        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,1,1
thirty,2,1,1,0
";
        let slice = EvaluationSlice::from_reader(csv.as_bytes(), 1).unwrap();
        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn test_non_binary_label() {
        let csv = "\
Age,NumberOfPurchases,LoyaltyProgram,DiscountsAvailed,PurchaseStatus
30,2,1,1,3
";
        let err = EvaluationSlice::from_reader(csv.as_bytes(), 10).unwrap_err();
        assert!(err.to_string().contains("must be 0 or 1, got 3"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let slice = EvaluationSlice::load(file.path(), 1500).unwrap();
        assert_eq!(slice.len(), 4);
    }
}
