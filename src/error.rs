use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid dataset row {row}: {message}")]
    InvalidDataset { row: usize, message: String },

    #[error("Invalid features: {0}")]
    InvalidFeatures(String),
}

impl PredictorError {
    /// HTTP status a handler should answer with when this error reaches it
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictorError::InvalidFeatures(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_errors_are_client_errors() {
        let err = PredictorError::InvalidFeatures("expected 4 or 5 values, got 3".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid features: expected 4 or 5 values, got 3"
        );
    }

    #[test]
    fn test_load_errors_are_server_errors() {
        let err = PredictorError::InvalidDataset {
            row: 7,
            message: "PurchaseStatus must be 0 or 1, got 2".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Invalid dataset row 7"));
    }
}
