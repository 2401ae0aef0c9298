//! Metrics registry for coordinating phase-specific metrics
//!
//! Registers every phase's metrics with the recorder and detects naming
//! conflicts between phases early.

use crate::metrics::{ApiMetrics, MetricDoc, ModelMetrics, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Register all metrics from all phases
pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<ApiMetrics>(&mut all_metrics);
    register_phase_metrics::<ModelMetrics>(&mut all_metrics);

    info!(
        "Registered {} total metrics across all phases",
        all_metrics.len()
    );

    log_metrics_summary(&all_metrics);
}

/// Register metrics for a specific phase and detect conflicts
fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_docs = T::metrics_documentation();
    let phase_name = T::phase_name();

    info!(
        "Registering {} metrics for phase '{}'",
        phase_docs.len(),
        phase_name
    );

    for doc in phase_docs {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' is defined again by phase '{}'",
                doc.name, phase_name
            );
        } else {
            all_metrics.insert(doc.name, doc);
        }
    }
}

/// Summarize registered metrics grouped by phase (visible at debug level)
fn log_metrics_summary(all_metrics: &HashMap<&'static str, MetricDoc>) -> HashMap<&'static str, usize> {
    let mut by_phase: HashMap<&'static str, Vec<&MetricDoc>> = HashMap::new();
    for doc in all_metrics.values() {
        by_phase
            .entry(extract_phase_from_metric_name(doc.name))
            .or_default()
            .push(doc);
    }

    let mut counts = HashMap::new();
    for (phase, metrics) in by_phase {
        debug!("Phase '{}': {} metrics", phase, metrics.len());
        for metric in &metrics {
            debug!(
                "  - {} ({:?}) [{}]: {}",
                metric.name,
                metric.metric_type,
                metric.labels.join(","),
                metric.help
            );
        }
        counts.insert(phase, metrics.len());
    }
    counts
}

/// Extract phase name from metric name (e.g., "pulse_api_requests_total" -> "api")
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("pulse_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_phase_from_metric_name() {
        assert_eq!(
            extract_phase_from_metric_name("pulse_api_requests_total"),
            "api"
        );
        assert_eq!(
            extract_phase_from_metric_name("pulse_model_load_duration_seconds"),
            "model"
        );
        assert_eq!(
            extract_phase_from_metric_name("invalid_metric_name"),
            "unknown"
        );
    }

    #[test]
    fn test_phase_names_match_metric_prefixes() {
        for doc in ApiMetrics::metrics_documentation() {
            assert_eq!(extract_phase_from_metric_name(doc.name), ApiMetrics::phase_name());
        }
        for doc in ModelMetrics::metrics_documentation() {
            assert_eq!(extract_phase_from_metric_name(doc.name), ModelMetrics::phase_name());
        }
    }

    #[test]
    fn test_no_conflicts_between_phases() {
        let mut all = HashMap::new();
        register_phase_metrics::<ApiMetrics>(&mut all);
        register_phase_metrics::<ModelMetrics>(&mut all);
        let expected =
            ApiMetrics::metrics_documentation().len() + ModelMetrics::metrics_documentation().len();
        assert_eq!(all.len(), expected);
    }

    #[test]
    fn test_summary_groups_by_phase() {
        let mut all = HashMap::new();
        register_phase_metrics::<ApiMetrics>(&mut all);
        register_phase_metrics::<ModelMetrics>(&mut all);

        let counts = log_metrics_summary(&all);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["api"], ApiMetrics::metrics_documentation().len());
        assert_eq!(counts["model"], ModelMetrics::metrics_documentation().len());
    }
}
