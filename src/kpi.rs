//! Closed-world KPI counter records.
//!
//! Each network function owns a fixed set of counters. They are modelled as
//! plain structs so that every key is always present, and each struct pairs
//! with an event enum naming exactly one of its fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Owning network function of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NfType {
    /// Mobility/registration manager.
    Amf,
    /// Session manager.
    Smf,
}

impl NfType {
    pub fn as_str(self) -> &'static str {
        match self {
            NfType::Amf => "AMF",
            NfType::Smf => "SMF",
        }
    }
}

impl fmt::Display for NfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-slice completed session counts keyed by `"<SST>-<SD>"`.
pub type SliceCounts = BTreeMap<String, u64>;

/// Canonical mobility events, one per counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobilityEvent {
    RegistrationRequest,
    RegistrationSuccess,
    AuthenticationRequest,
    AuthenticationSuccess,
    AuthenticationFailure,
    AuthenticationRetry,
    RegistrationReject,
}

impl MobilityEvent {
    pub const ALL: [MobilityEvent; 7] = [
        MobilityEvent::RegistrationRequest,
        MobilityEvent::RegistrationSuccess,
        MobilityEvent::AuthenticationRequest,
        MobilityEvent::AuthenticationSuccess,
        MobilityEvent::AuthenticationFailure,
        MobilityEvent::AuthenticationRetry,
        MobilityEvent::RegistrationReject,
    ];

    pub fn kpi_name(self) -> &'static str {
        match self {
            MobilityEvent::RegistrationRequest => "registration_request",
            MobilityEvent::RegistrationSuccess => "registration_success",
            MobilityEvent::AuthenticationRequest => "authentication_request",
            MobilityEvent::AuthenticationSuccess => "authentication_success",
            MobilityEvent::AuthenticationFailure => "authentication_failure",
            MobilityEvent::AuthenticationRetry => "authentication_retry",
            MobilityEvent::RegistrationReject => "registration_reject",
        }
    }

    pub fn from_kpi_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.kpi_name() == name)
    }
}

/// Registration and authentication counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilityKpis {
    pub registration_request: u64,
    pub registration_success: u64,
    pub authentication_request: u64,
    pub authentication_success: u64,
    pub authentication_failure: u64,
    pub authentication_retry: u64,
    pub registration_reject: u64,
}

impl MobilityKpis {
    pub fn get(&self, event: MobilityEvent) -> u64 {
        *self.slot(event)
    }

    pub fn add(&mut self, event: MobilityEvent, n: u64) {
        *self.slot_mut(event) += n;
    }

    pub fn increment(&mut self, event: MobilityEvent) {
        self.add(event, 1);
    }

    /// All counters as `(kpi_name, value)` in canonical order.
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        MobilityEvent::ALL
            .into_iter()
            .map(|e| (e.kpi_name(), self.get(e)))
            .collect()
    }

    pub fn total(&self) -> u64 {
        MobilityEvent::ALL.into_iter().map(|e| self.get(e)).sum()
    }

    /// Fold aggregated sums back into the fixed record; names outside the
    /// counter set are ignored.
    pub fn from_sums(sums: &BTreeMap<String, u64>) -> Self {
        let mut kpis = Self::default();
        for (name, value) in sums {
            match MobilityEvent::from_kpi_name(name) {
                Some(event) => kpis.add(event, *value),
                None => debug!(kpi_name = %name, "ignoring unknown mobility kpi"),
            }
        }
        kpis
    }

    fn slot(&self, event: MobilityEvent) -> &u64 {
        match event {
            MobilityEvent::RegistrationRequest => &self.registration_request,
            MobilityEvent::RegistrationSuccess => &self.registration_success,
            MobilityEvent::AuthenticationRequest => &self.authentication_request,
            MobilityEvent::AuthenticationSuccess => &self.authentication_success,
            MobilityEvent::AuthenticationFailure => &self.authentication_failure,
            MobilityEvent::AuthenticationRetry => &self.authentication_retry,
            MobilityEvent::RegistrationReject => &self.registration_reject,
        }
    }

    fn slot_mut(&mut self, event: MobilityEvent) -> &mut u64 {
        match event {
            MobilityEvent::RegistrationRequest => &mut self.registration_request,
            MobilityEvent::RegistrationSuccess => &mut self.registration_success,
            MobilityEvent::AuthenticationRequest => &mut self.authentication_request,
            MobilityEvent::AuthenticationSuccess => &mut self.authentication_success,
            MobilityEvent::AuthenticationFailure => &mut self.authentication_failure,
            MobilityEvent::AuthenticationRetry => &mut self.authentication_retry,
            MobilityEvent::RegistrationReject => &mut self.registration_reject,
        }
    }
}

/// Canonical session events, one per counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    PduSessionCreateRequest,
    PduSessionEstComplete,
    PduSessionEstReject,
    PolicyAssociationRequest,
    PolicyAssociationResponse,
    PolicyAssociationFailure,
    PfcpSessionEstablishmentRequest,
    PfcpSessionEstablishmentResponse,
    PfcpSessionEstablishmentFailure,
}

impl SessionEvent {
    pub const ALL: [SessionEvent; 9] = [
        SessionEvent::PduSessionCreateRequest,
        SessionEvent::PduSessionEstComplete,
        SessionEvent::PduSessionEstReject,
        SessionEvent::PolicyAssociationRequest,
        SessionEvent::PolicyAssociationResponse,
        SessionEvent::PolicyAssociationFailure,
        SessionEvent::PfcpSessionEstablishmentRequest,
        SessionEvent::PfcpSessionEstablishmentResponse,
        SessionEvent::PfcpSessionEstablishmentFailure,
    ];

    pub fn kpi_name(self) -> &'static str {
        match self {
            SessionEvent::PduSessionCreateRequest => "pdu_session_create_request",
            SessionEvent::PduSessionEstComplete => "pdu_session_est_complete",
            SessionEvent::PduSessionEstReject => "pdu_session_est_reject",
            SessionEvent::PolicyAssociationRequest => "policy_association_request",
            SessionEvent::PolicyAssociationResponse => "policy_association_response",
            SessionEvent::PolicyAssociationFailure => "policy_association_failure",
            SessionEvent::PfcpSessionEstablishmentRequest => "pfcp_session_establishment_request",
            SessionEvent::PfcpSessionEstablishmentResponse => "pfcp_session_establishment_response",
            SessionEvent::PfcpSessionEstablishmentFailure => "pfcp_session_establishment_failure",
        }
    }

    pub fn from_kpi_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.kpi_name() == name)
    }
}

/// PDU session, SM policy and PFCP counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKpis {
    pub pdu_session_create_request: u64,
    pub pdu_session_est_complete: u64,
    pub pdu_session_est_reject: u64,
    pub policy_association_request: u64,
    pub policy_association_response: u64,
    pub policy_association_failure: u64,
    pub pfcp_session_establishment_request: u64,
    pub pfcp_session_establishment_response: u64,
    pub pfcp_session_establishment_failure: u64,
}

impl SessionKpis {
    pub fn get(&self, event: SessionEvent) -> u64 {
        *self.slot(event)
    }

    pub fn add(&mut self, event: SessionEvent, n: u64) {
        *self.slot_mut(event) += n;
    }

    pub fn increment(&mut self, event: SessionEvent) {
        self.add(event, 1);
    }

    /// All counters as `(kpi_name, value)` in canonical order.
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        SessionEvent::ALL
            .into_iter()
            .map(|e| (e.kpi_name(), self.get(e)))
            .collect()
    }

    pub fn total(&self) -> u64 {
        SessionEvent::ALL.into_iter().map(|e| self.get(e)).sum()
    }

    pub fn from_sums(sums: &BTreeMap<String, u64>) -> Self {
        let mut kpis = Self::default();
        for (name, value) in sums {
            match SessionEvent::from_kpi_name(name) {
                Some(event) => kpis.add(event, *value),
                None => debug!(kpi_name = %name, "ignoring unknown session kpi"),
            }
        }
        kpis
    }

    fn slot(&self, event: SessionEvent) -> &u64 {
        match event {
            SessionEvent::PduSessionCreateRequest => &self.pdu_session_create_request,
            SessionEvent::PduSessionEstComplete => &self.pdu_session_est_complete,
            SessionEvent::PduSessionEstReject => &self.pdu_session_est_reject,
            SessionEvent::PolicyAssociationRequest => &self.policy_association_request,
            SessionEvent::PolicyAssociationResponse => &self.policy_association_response,
            SessionEvent::PolicyAssociationFailure => &self.policy_association_failure,
            SessionEvent::PfcpSessionEstablishmentRequest => {
                &self.pfcp_session_establishment_request
            }
            SessionEvent::PfcpSessionEstablishmentResponse => {
                &self.pfcp_session_establishment_response
            }
            SessionEvent::PfcpSessionEstablishmentFailure => {
                &self.pfcp_session_establishment_failure
            }
        }
    }

    fn slot_mut(&mut self, event: SessionEvent) -> &mut u64 {
        match event {
            SessionEvent::PduSessionCreateRequest => &mut self.pdu_session_create_request,
            SessionEvent::PduSessionEstComplete => &mut self.pdu_session_est_complete,
            SessionEvent::PduSessionEstReject => &mut self.pdu_session_est_reject,
            SessionEvent::PolicyAssociationRequest => &mut self.policy_association_request,
            SessionEvent::PolicyAssociationResponse => &mut self.policy_association_response,
            SessionEvent::PolicyAssociationFailure => &mut self.policy_association_failure,
            SessionEvent::PfcpSessionEstablishmentRequest => {
                &mut self.pfcp_session_establishment_request
            }
            SessionEvent::PfcpSessionEstablishmentResponse => {
                &mut self.pfcp_session_establishment_response
            }
            SessionEvent::PfcpSessionEstablishmentFailure => {
                &mut self.pfcp_session_establishment_failure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_cover_every_key() {
        let m = MobilityKpis::default();
        assert_eq!(m.entries().len(), 7);
        assert!(m.entries().iter().all(|(_, v)| *v == 0));

        let s = SessionKpis::default();
        assert_eq!(s.entries().len(), 9);
    }

    #[test]
    fn test_kpi_names_round_trip_through_lookup() {
        for e in MobilityEvent::ALL {
            assert_eq!(MobilityEvent::from_kpi_name(e.kpi_name()), Some(e));
        }
        for e in SessionEvent::ALL {
            assert_eq!(SessionEvent::from_kpi_name(e.kpi_name()), Some(e));
        }
        assert_eq!(MobilityEvent::from_kpi_name("registration_complete"), None);
    }

    #[test]
    fn test_from_sums_defaults_missing_and_ignores_unknown() {
        let mut sums = BTreeMap::new();
        sums.insert("registration_success".to_string(), 80);
        sums.insert("bogus".to_string(), 3);

        let kpis = MobilityKpis::from_sums(&sums);
        assert_eq!(kpis.registration_success, 80);
        assert_eq!(kpis.registration_reject, 0);
        assert_eq!(kpis.total(), 80);
    }

    #[test]
    fn test_serializes_all_fields() {
        let value = serde_json::to_value(SessionKpis::default()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 9);
        assert_eq!(obj["pdu_session_est_complete"], 0);
    }
}
