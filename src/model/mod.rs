pub mod features;
pub mod logistic;

pub use features::FeatureVector;
pub use logistic::LogisticModel;
