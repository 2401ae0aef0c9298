use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::evaluation::{FeatureImportance, PerformanceReport};
use crate::metrics::ApiMetrics;
use crate::model::FeatureVector;
use crate::state::SharedState;

const PREDICT: &str = "predict";
const PERFORMANCE: &str = "performance";
const IMPORTANCE: &str = "importance";

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: i64,
    pub probability: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model_fingerprint: String,
    pub evaluation_samples: usize,
    pub started_at: String,
}

/// Health check endpoint
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model_fingerprint: state.model.fingerprint().to_string(),
        evaluation_samples: state.evaluation.len(),
        started_at: state.started_at.to_rfc3339(),
    })
}

/// Classify a single customer
pub async fn predict(
    State(state): State<SharedState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, Response> {
    let started = Instant::now();

    let reject = |status: StatusCode| {
        ApiMetrics::record_rejected(PREDICT);
        ApiMetrics::record_request(PREDICT, status.as_u16(), started.elapsed().as_secs_f64());
    };

    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected predict body: {}", rejection.body_text());
        reject(rejection.status());
        rejection.into_response()
    })?;

    let features = FeatureVector::from_values(&request.features).map_err(|e| {
        reject(e.status_code());
        e.into_response()
    })?;

    let prediction = state.model.predict(&features);
    let probability = state.model.predict_proba(&features);
    debug!(
        "Predicted class {} (p={:.4}) for {:?}",
        prediction,
        probability,
        features.values()
    );

    ApiMetrics::record_prediction(prediction);
    ApiMetrics::record_request(
        PREDICT,
        StatusCode::OK.as_u16(),
        started.elapsed().as_secs_f64(),
    );
    Ok(Json(PredictResponse {
        prediction,
        probability,
    }))
}

/// Confusion-matrix counts on the evaluation slice
pub async fn performance(State(state): State<SharedState>) -> Json<PerformanceReport> {
    let started = Instant::now();
    let report = state.performance.clone();
    ApiMetrics::record_request(
        PERFORMANCE,
        StatusCode::OK.as_u16(),
        started.elapsed().as_secs_f64(),
    );
    Json(report)
}

/// Features ranked by absolute coefficient
pub async fn importance(State(state): State<SharedState>) -> Json<Vec<FeatureImportance>> {
    let started = Instant::now();
    let ranked = state.importance.clone();
    ApiMetrics::record_request(
        IMPORTANCE,
        StatusCode::OK.as_u16(),
        started.elapsed().as_secs_f64(),
    );
    Json(ranked)
}
