use serde::Serialize;

use crate::kpi::{MobilityKpis, SessionKpis};
use crate::rates::percentage;

/// Headline KPIs across both network functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub registered_ues: u64,
    pub pdu_sessions_established: u64,
    pub registration_failures: u64,
    pub pdu_session_failures: u64,
    pub registration_success_rate: f64,
    pub session_success_rate: f64,
}

/// Each rate is sourced from its own function's aggregate only.
pub fn summarize(mobility: &MobilityKpis, session: &SessionKpis) -> KpiSummary {
    let reg_ok = mobility.registration_success;
    let reg_fail = mobility.registration_reject;
    let pdu_ok = session.pdu_session_est_complete;
    let pdu_fail = session.pdu_session_est_reject;

    KpiSummary {
        registered_ues: reg_ok,
        pdu_sessions_established: pdu_ok,
        registration_failures: reg_fail,
        pdu_session_failures: pdu_fail,
        registration_success_rate: percentage(reg_ok, reg_ok.saturating_add(reg_fail)),
        session_success_rate: percentage(pdu_ok, pdu_ok.saturating_add(pdu_fail)),
    }
}
