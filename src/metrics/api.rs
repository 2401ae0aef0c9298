//! Request-handling metrics

use crate::metrics::{describe_phase, phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ApiMetrics;

impl ApiMetrics {
    /// Record a served request and how long it took
    pub fn record_request(endpoint: &'static str, status: u16, duration_secs: f64) {
        ::metrics::counter!(
            phase_metric!(counter, "api", "requests"),
            "endpoint" => endpoint,
            "status" => status.to_string()
        )
        .increment(1);
        ::metrics::histogram!(
            phase_metric!(histogram, "api", "request_duration_seconds"),
            "endpoint" => endpoint
        )
        .record(duration_secs);
    }

    /// Record a single prediction by predicted class
    pub fn record_prediction(class: i64) {
        ::metrics::counter!(
            phase_metric!(counter, "api", "predictions"),
            "class" => class.to_string()
        )
        .increment(1);
    }

    /// Record a request rejected for malformed features
    pub fn record_rejected(endpoint: &'static str) {
        ::metrics::counter!(
            phase_metric!(counter, "api", "rejected_requests"),
            "endpoint" => endpoint
        )
        .increment(1);
    }
}

impl PhaseMetrics for ApiMetrics {
    fn register_metrics() {
        describe_phase::<Self>();
    }

    fn phase_name() -> &'static str {
        "api"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "api", "requests"),
                metric_type: MetricType::Counter,
                help: "Total number of HTTP requests served",
                labels: vec!["endpoint", "status"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "api", "request_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Handler latency in seconds",
                labels: vec!["endpoint"],
            },
            MetricDoc {
                name: phase_metric!(counter, "api", "predictions"),
                metric_type: MetricType::Counter,
                help: "Total number of single-sample predictions by predicted class",
                labels: vec!["class"],
            },
            MetricDoc {
                name: phase_metric!(counter, "api", "rejected_requests"),
                metric_type: MetricType::Counter,
                help: "Requests rejected because of invalid features",
                labels: vec!["endpoint"],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        ApiMetrics::record_request("predict", 200, 0.002);
        ApiMetrics::record_prediction(1);
        ApiMetrics::record_rejected("predict");
    }

    #[test]
    fn test_documentation_names_are_prefixed() {
        for doc in ApiMetrics::metrics_documentation() {
            assert!(doc.name.starts_with("pulse_api_"), "{}", doc.name);
        }
    }
}
