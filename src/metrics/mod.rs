//! Prometheus metrics for the prediction service
//!
//! Each phase (request handling, model lifecycle) defines its own metrics in a
//! dedicated submodule so names stay unique and documented in one place.

pub mod api;
pub mod model;
pub mod registry;

pub use api::ApiMetrics;
pub use model::ModelMetrics;

use crate::error::{PredictorError, Result};
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use tracing::info;

static EXPORTER_ADDR: OnceCell<SocketAddr> = OnceCell::new();

/// Install the Prometheus recorder and its HTTP listener.
///
/// Idempotent; a second call returns the address of the first install. Must be
/// called from inside a Tokio runtime because the listener is spawned on it.
pub fn init_metrics(addr: SocketAddr) -> Result<SocketAddr> {
    EXPORTER_ADDR
        .get_or_try_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()
                .map_err(|e| {
                    PredictorError::Config(format!("failed to install metrics exporter: {}", e))
                })?;
            info!("Prometheus exporter listening on http://{}/metrics", addr);

            registry::register_all_metrics();
            Ok(addr)
        })
        .copied()
}

/// Per-phase metric set
///
/// Each phase implements this trait to provide:
/// - Metric registration at startup
/// - Consistent naming conventions
/// - Documentation of what each metric measures
pub trait PhaseMetrics {
    /// Describe all metrics for this phase to the installed recorder
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Build a metric name following `pulse_{phase}_{metric_name}[_total]`
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("pulse_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("pulse_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("pulse_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

/// Describe every documented metric of a phase to the recorder
pub(crate) fn describe_phase<T: PhaseMetrics>() {
    for doc in T::metrics_documentation() {
        match doc.metric_type {
            MetricType::Counter => ::metrics::describe_counter!(doc.name, doc.help),
            MetricType::Histogram => ::metrics::describe_histogram!(doc.name, doc.help),
            MetricType::Gauge => ::metrics::describe_gauge!(doc.name, doc.help),
        }
    }
}
