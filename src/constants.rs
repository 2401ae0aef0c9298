//! Feature schema constants shared by the model, the dataset loader and the API.
//! The model was fitted on these columns in exactly this order.

pub const FEATURE_COUNT: usize = 5;

// Raw input columns (as they appear in the dataset header)
pub const AGE_COLUMN: &str = "Age";
pub const PURCHASES_COLUMN: &str = "NumberOfPurchases";
pub const LOYALTY_COLUMN: &str = "LoyaltyProgram";
pub const DISCOUNTS_COLUMN: &str = "DiscountsAvailed";
pub const LABEL_COLUMN: &str = "PurchaseStatus";

// Derived column: LoyaltyProgram * DiscountsAvailed
pub const INTERACTION_COLUMN: &str = "LoyaltyProgram_Discounts";

/// Training-time column names, in model order
pub const TRAINING_COLUMNS: [&str; FEATURE_COUNT] = [
    AGE_COLUMN,
    PURCHASES_COLUMN,
    LOYALTY_COLUMN,
    DISCOUNTS_COLUMN,
    INTERACTION_COLUMN,
];

/// Human-friendly names reported by the importance endpoint, in model order
pub const DISPLAY_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "purchases",
    "loyalty",
    "discounts",
    "discounts x loyalty",
];

/// Columns the evaluation dataset must carry
pub const REQUIRED_DATASET_COLUMNS: [&str; 5] = [
    AGE_COLUMN,
    PURCHASES_COLUMN,
    LOYALTY_COLUMN,
    DISCOUNTS_COLUMN,
    LABEL_COLUMN,
];

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "prediction/logistic_model.json";
pub const DEFAULT_DATASET_PATH: &str = "prediction/dataset1.csv";
pub const DEFAULT_CONFIG_PATH: &str = "purchase_pulse.toml";
pub const DEFAULT_EVAL_ROWS: usize = 1500;
