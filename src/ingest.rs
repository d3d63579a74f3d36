//! Batch ingestion: read a log file, extract counters, append the batch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, info_span, warn};

use crate::error::Result;
use crate::extract::{extract_mobility, extract_session};
use crate::kpi::{MobilityKpis, NfType, SessionKpis, SliceCounts};
use crate::log_reader::read_log;
use crate::metrics::IngestMetrics;
use crate::store::KpiStore;

#[derive(Debug, Clone, Serialize)]
pub struct MobilityIngest {
    pub lines: usize,
    pub unmatched: usize,
    pub kpis: MobilityKpis,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionIngest {
    pub lines: usize,
    pub unmatched: usize,
    pub kpis: SessionKpis,
    pub slices: SliceCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub timestamp: DateTime<Utc>,
    pub mobility: MobilityIngest,
    pub session: SessionIngest,
}

/// Extract an AMF log and append its counters as one batch.
pub fn ingest_mobility(store: &KpiStore, path: &Path, timestamp: DateTime<Utc>) -> Result<MobilityIngest> {
    let _span = info_span!("ingest_mobility", log = %path.display()).entered();
    let lines = read_log(path)?;
    let out = extract_mobility(&lines);
    IngestMetrics::record_extraction(NfType::Amf, out.lines, out.unmatched);
    if out.unmatched > 0 {
        info!(unmatched = out.unmatched, "lines matched no mobility rule");
    }

    let rows = store.append_mobility(&out.kpis, timestamp)?;
    IngestMetrics::record_batch(rows);
    info!(lines = out.lines, rows, "mobility KPIs stored");

    Ok(MobilityIngest {
        lines: out.lines,
        unmatched: out.unmatched,
        kpis: out.kpis,
    })
}

/// Extract an SMF log and append its counters and slice counts.
///
/// The counter batch and the slice batch are separate transactions, so a
/// failure on the slice write leaves the counter batch committed.
pub fn ingest_session(store: &KpiStore, path: &Path, timestamp: DateTime<Utc>) -> Result<SessionIngest> {
    let _span = info_span!("ingest_session", log = %path.display()).entered();
    let lines = read_log(path)?;
    let out = extract_session(&lines);
    IngestMetrics::record_extraction(NfType::Smf, out.lines, out.unmatched);
    if out.unmatched > 0 {
        info!(unmatched = out.unmatched, "lines matched no session rule");
    }

    let rows = store.append_session(&out.kpis, timestamp)?;
    IngestMetrics::record_batch(rows);
    if out.slices.is_empty() {
        warn!("no slice descriptors found on completion lines");
    } else {
        let slice_rows = store.append_slices(NfType::Smf, &out.slices, timestamp)?;
        IngestMetrics::record_batch(slice_rows);
    }
    info!(lines = out.lines, rows, slices = out.slices.len(), "session KPIs stored");

    Ok(SessionIngest {
        lines: out.lines,
        unmatched: out.unmatched,
        kpis: out.kpis,
        slices: out.slices,
    })
}

/// One complete ingestion run over an AMF and an SMF log.
pub fn run_ingest(store: &KpiStore, amf_log: &Path, smf_log: &Path) -> Result<IngestReport> {
    let started = Instant::now();
    let timestamp = Utc::now();
    info!("Starting KPI ingestion run");

    let result = ingest_mobility(store, amf_log, timestamp)
        .and_then(|mobility| Ok((mobility, ingest_session(store, smf_log, timestamp)?)));

    let elapsed = started.elapsed().as_secs_f64();
    IngestMetrics::record_duration(elapsed);
    match result {
        Ok((mobility, session)) => {
            info!(elapsed_secs = elapsed, "KPI ingestion run completed");
            Ok(IngestReport {
                timestamp,
                mobility,
                session,
            })
        }
        Err(e) => {
            IngestMetrics::record_error();
            error!("KPI ingestion run failed: {}", e);
            Err(e)
        }
    }
}
