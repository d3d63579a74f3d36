//! Read API metrics.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ApiMetrics;

impl ApiMetrics {
    pub fn record_request(endpoint: &'static str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        ::metrics::counter!(
            phase_metric!(counter, "api", "requests"),
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);
    }
}

impl PhaseMetrics for ApiMetrics {
    fn register_metrics() {
        for doc in Self::metrics_documentation() {
            ::metrics::describe_counter!(doc.name, doc.help);
        }
    }

    fn phase_name() -> &'static str {
        "api"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![MetricDoc {
            name: phase_metric!(counter, "api", "requests"),
            metric_type: MetricType::Counter,
            help: "Read API requests by endpoint and outcome",
            labels: vec!["endpoint", "outcome"],
        }]
    }
}
