use crate::config::Config;
use crate::dataset::EvaluationSlice;
use crate::error::Result;
use crate::evaluation::{evaluate, feature_importance, FeatureImportance, PerformanceReport};
use crate::metrics::ModelMetrics;
use crate::model::LogisticModel;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::info;

/// Process-wide resources, loaded once at startup and read-only afterwards
#[derive(Debug)]
pub struct AppState {
    pub model: LogisticModel,
    pub evaluation: EvaluationSlice,
    pub performance: PerformanceReport,
    pub importance: Vec<FeatureImportance>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Score the model once against the slice and cache the results
    pub fn new(model: LogisticModel, evaluation: EvaluationSlice) -> Result<Self> {
        let performance = PerformanceReport::from(evaluate(&model, &evaluation)?);
        let importance = feature_importance(&model);

        info!(
            "Model scored on {} rows: TP={} TN={} FP={} FN={} accuracy={:.3}",
            performance.samples,
            performance.tp,
            performance.tn,
            performance.fp,
            performance.fn_,
            performance.accuracy
        );

        Ok(Self {
            model,
            evaluation,
            performance,
            importance,
            started_at: Utc::now(),
        })
    }

    /// Load the model artifact and evaluation slice named by `config`
    pub fn load(config: &Config) -> Result<Self> {
        let started = Instant::now();
        let model = LogisticModel::load(&config.model.path)?;
        let evaluation = EvaluationSlice::load(&config.dataset.path, config.dataset.eval_rows)?;
        let state = Self::new(model, evaluation)?;

        ModelMetrics::record_loaded(
            started.elapsed().as_secs_f64(),
            state.evaluation.len(),
            state.performance.accuracy,
        );
        Ok(state)
    }
}

pub type SharedState = std::sync::Arc<AppState>;
