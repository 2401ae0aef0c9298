pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{PredictorError, Result};
pub use model::{FeatureVector, LogisticModel};
pub use state::{AppState, SharedState};
