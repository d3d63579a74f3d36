//! Read API consumed by the HTTP layer and the `report` command.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::kpi::{MobilityKpis, SessionKpis};
use crate::rates::{mobility_rates, session_rates, MobilityRates, SessionRates};
use crate::slices::{slice_report, slice_shares, SliceReport};
use crate::store::{KpiStore, Partition};
use crate::summary::{summarize, KpiSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilityView {
    pub kpis: MobilityKpis,
    pub rates: MobilityRates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub kpis: SessionKpis,
    pub rates: SessionRates,
}

/// Outcome of one read call, always serializable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Data(Value),
    Message { message: String },
    Error { error: String },
}

impl ApiResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error { .. })
    }

    /// Turn a read result into a response, logging failures.
    pub fn from_result<T: Serialize>(endpoint: &str, result: Result<Option<T>>) -> Self {
        let failure = |detail: String| {
            error!(endpoint, "read failed: {}", detail);
            ApiResponse::Error {
                error: format!("Failed to fetch {} KPI data", endpoint),
            }
        };
        match result {
            Ok(Some(data)) => match serde_json::to_value(data) {
                Ok(value) => ApiResponse::Data(value),
                Err(e) => failure(e.to_string()),
            },
            Ok(None) => {
                warn!(endpoint, "no KPI data available");
                ApiResponse::Message {
                    message: format!("No {} KPI data available", endpoint),
                }
            }
            Err(e) => failure(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KpiService {
    store: KpiStore,
}

impl KpiService {
    pub fn new(store: KpiStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &KpiStore {
        &self.store
    }

    pub fn summary(&self) -> Result<KpiSummary> {
        info!("Fetching KPI summary");
        let mobility = self.store.mobility_totals()?;
        let session = self.store.session_totals()?;
        let summary = summarize(&mobility, &session);
        debug!(?summary, "KPI summary");
        Ok(summary)
    }

    /// `None` when nothing has been ingested for the mobility function.
    pub fn mobility(&self) -> Result<Option<MobilityView>> {
        info!("Fetching mobility KPIs");
        let sums = self.store.sum_by_key(Partition::Mobility)?;
        if sums.is_empty() {
            return Ok(None);
        }
        let kpis = MobilityKpis::from_sums(&sums);
        Ok(Some(MobilityView {
            rates: mobility_rates(&kpis),
            kpis,
        }))
    }

    /// `None` when nothing has been ingested for the session function.
    pub fn session(&self) -> Result<Option<SessionView>> {
        info!("Fetching session KPIs");
        let sums = self.store.sum_by_key(Partition::Session)?;
        if sums.is_empty() {
            return Ok(None);
        }
        let kpis = SessionKpis::from_sums(&sums);
        Ok(Some(SessionView {
            rates: session_rates(&kpis),
            kpis,
        }))
    }

    pub fn slices(&self) -> Result<SliceReport> {
        info!("Fetching slice KPIs");
        let report = slice_report(&self.store.sum_by_slice()?);
        info!("Processed slice KPIs for {} slices", report.len());
        Ok(report)
    }

    pub fn slice_shares(&self) -> Result<BTreeMap<String, f64>> {
        Ok(slice_shares(&self.slices()?))
    }

    pub fn summary_response(&self) -> ApiResponse {
        ApiResponse::from_result("summary", self.summary().map(Some))
    }

    pub fn mobility_response(&self) -> ApiResponse {
        ApiResponse::from_result("mobility", self.mobility())
    }

    pub fn session_response(&self) -> ApiResponse {
        ApiResponse::from_result("session", self.session())
    }

    pub fn slices_response(&self) -> ApiResponse {
        ApiResponse::from_result("slice", self.slices().map(Some))
    }

    pub fn slice_shares_response(&self) -> ApiResponse {
        ApiResponse::from_result("slice share", self.slice_shares().map(Some))
    }
}
