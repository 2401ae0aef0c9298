//! Model lifecycle metrics, recorded once at startup

use crate::metrics::{describe_phase, phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ModelMetrics;

impl ModelMetrics {
    pub fn record_loaded(load_duration_secs: f64, evaluation_samples: usize, accuracy: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "model", "load_duration_seconds"))
            .record(load_duration_secs);
        ::metrics::gauge!(phase_metric!(gauge, "model", "evaluation_samples"))
            .set(evaluation_samples as f64);
        ::metrics::gauge!(phase_metric!(gauge, "model", "evaluation_accuracy")).set(accuracy);
    }
}

impl PhaseMetrics for ModelMetrics {
    fn register_metrics() {
        describe_phase::<Self>();
    }

    fn phase_name() -> &'static str {
        "model"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(histogram, "model", "load_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent loading the model and evaluation slice",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "model", "evaluation_samples"),
                metric_type: MetricType::Gauge,
                help: "Rows in the evaluation slice",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "model", "evaluation_accuracy"),
                metric_type: MetricType::Gauge,
                help: "Accuracy of the model on the evaluation slice",
                labels: vec![],
            },
        ]
    }
}
