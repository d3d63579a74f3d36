//! Operational metrics for ingestion runs and the read API.
//!
//! Each area defines its metrics in its own submodule and documents them
//! through [`PhaseMetrics`], so names are validated in one place at startup.

pub mod api;
pub mod ingest;

pub use api::ApiMetrics;
pub use ingest::IngestMetrics;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Install the Prometheus exporter on `addr` and register all metrics.
///
/// Idempotent. Without an address the `metrics` facade stays a no-op, which
/// is what tests and one-shot CLI commands want.
pub fn init_metrics(addr: Option<SocketAddr>) {
    let Some(addr) = addr else {
        info!("metrics: no exporter address configured, metrics disabled");
        return;
    };
    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        match builder.install() {
            Ok(()) => {
                info!("Prometheus exporter listening on http://{}/metrics", addr);
                register_all_metrics();
            }
            Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
        }
    });
}

/// Trait for area-specific metric collections
pub trait PhaseMetrics {
    /// Describe every metric of this area to the installed recorder.
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

/// Naming convention: `kpi_{phase}_{metric_name}[_total]`
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("kpi_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("kpi_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("kpi_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

/// Register every area's metrics and warn about duplicate names.
pub fn register_all_metrics() -> usize {
    let mut all_metrics = HashMap::new();
    register_phase_metrics::<IngestMetrics>(&mut all_metrics);
    register_phase_metrics::<ApiMetrics>(&mut all_metrics);
    info!("Registered {} metrics", all_metrics.len());
    all_metrics.len()
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' redefined by phase '{}'",
                doc.name,
                T::phase_name()
            );
        } else {
            all_metrics.insert(doc.name, doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_naming_convention() {
        assert_eq!(
            phase_metric!(counter, "ingest", "lines"),
            "kpi_ingest_lines_total"
        );
        assert_eq!(
            phase_metric!(histogram, "ingest", "duration_seconds"),
            "kpi_ingest_duration_seconds"
        );
    }

    #[test]
    fn test_no_name_conflicts() {
        let expected = IngestMetrics::metrics_documentation().len()
            + ApiMetrics::metrics_documentation().len();
        assert_eq!(register_all_metrics(), expected);
    }

    #[test]
    fn test_init_without_addr_is_noop() {
        init_metrics(None);
    }
}
