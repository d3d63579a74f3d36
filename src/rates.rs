//! Success/failure percentages derived from aggregated counters.
//!
//! All rates are rounded to two decimals and are 0 when their denominator
//! is 0.

use serde::Serialize;

use crate::kpi::{MobilityKpis, SessionKpis};

/// `part / total * 100`, rounded to 2 decimals; 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(success rate, failure rate)` over `success + failure`.
pub fn split_rate(success: u64, failure: u64) -> (f64, f64) {
    let total = success.saturating_add(failure);
    (percentage(success, total), percentage(failure, total))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MobilityRates {
    #[serde(rename = "Registration Success Rate")]
    pub registration_success: f64,
    #[serde(rename = "Registration Failure Rate")]
    pub registration_failure: f64,
    #[serde(rename = "Authentication Success Rate")]
    pub authentication_success: f64,
    #[serde(rename = "Authentication Failure Rate")]
    pub authentication_failure: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionRates {
    #[serde(rename = "PDU Session Establishment Success Rate")]
    pub pdu_session_success: f64,
    #[serde(rename = "PDU Session Establishment Failure Rate")]
    pub pdu_session_failure: f64,
    #[serde(rename = "SM Policy Association Success Rate")]
    pub policy_association_success: f64,
    #[serde(rename = "SM Policy Association Failure Rate")]
    pub policy_association_failure: f64,
    #[serde(rename = "PFCP Session Success Rate")]
    pub pfcp_session_success: f64,
    #[serde(rename = "PFCP Session Failure Rate")]
    pub pfcp_session_failure: f64,
}

/// Retries are not part of the authentication denominator.
pub fn mobility_rates(kpis: &MobilityKpis) -> MobilityRates {
    let (registration_success, registration_failure) =
        split_rate(kpis.registration_success, kpis.registration_reject);
    let (authentication_success, authentication_failure) =
        split_rate(kpis.authentication_success, kpis.authentication_failure);
    MobilityRates {
        registration_success,
        registration_failure,
        authentication_success,
        authentication_failure,
    }
}

pub fn session_rates(kpis: &SessionKpis) -> SessionRates {
    let (pdu_session_success, pdu_session_failure) =
        split_rate(kpis.pdu_session_est_complete, kpis.pdu_session_est_reject);
    let (policy_association_success, policy_association_failure) = split_rate(
        kpis.policy_association_response,
        kpis.policy_association_failure,
    );
    let (pfcp_session_success, pfcp_session_failure) = split_rate(
        kpis.pfcp_session_establishment_response,
        kpis.pfcp_session_establishment_failure,
    );
    SessionRates {
        pdu_session_success,
        pdu_session_failure,
        policy_association_success,
        policy_association_failure,
        pfcp_session_success,
        pfcp_session_failure,
    }
}
