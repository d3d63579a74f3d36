//! Ingestion run metrics.

use crate::kpi::NfType;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct IngestMetrics;

impl IngestMetrics {
    /// Record one extracted log file.
    pub fn record_extraction(nf: NfType, lines: usize, unmatched: usize) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "lines"), "nf" => nf.as_str())
            .increment(lines as u64);
        ::metrics::counter!(phase_metric!(counter, "ingest", "unmatched_lines"), "nf" => nf.as_str())
            .increment(unmatched as u64);
    }

    pub fn record_batch(rows: usize) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "batches")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "ingest", "rows")).increment(rows as u64);
    }

    pub fn record_error() {
        ::metrics::counter!(phase_metric!(counter, "ingest", "errors")).increment(1);
    }

    pub fn record_duration(duration_secs: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "ingest", "duration_seconds"))
            .record(duration_secs);
    }
}

impl PhaseMetrics for IngestMetrics {
    fn register_metrics() {
        for doc in Self::metrics_documentation() {
            match doc.metric_type {
                MetricType::Counter => ::metrics::describe_counter!(doc.name, doc.help),
                MetricType::Histogram => ::metrics::describe_histogram!(doc.name, doc.help),
                MetricType::Gauge => ::metrics::describe_gauge!(doc.name, doc.help),
            }
        }
    }

    fn phase_name() -> &'static str {
        "ingest"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "ingest", "lines"),
                metric_type: MetricType::Counter,
                help: "Log lines read by the extractors",
                labels: vec!["nf"],
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "unmatched_lines"),
                metric_type: MetricType::Counter,
                help: "Log lines that matched no extraction rule",
                labels: vec!["nf"],
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "batches"),
                metric_type: MetricType::Counter,
                help: "Fact batches committed to the KPI store",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "rows"),
                metric_type: MetricType::Counter,
                help: "Fact rows committed to the KPI store",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "errors"),
                metric_type: MetricType::Counter,
                help: "Ingestion runs that failed",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "ingest", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of a complete ingestion run",
                labels: vec![],
            },
        ]
    }
}
