//! PDU session, SM policy and PFCP events from SMF logs, plus per-slice
//! counts of completed sessions.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RuleSet;
use crate::kpi::{SessionEvent, SessionKpis, SliceCounts};

static SESSION_RULES: Lazy<RuleSet<SessionEvent>> = Lazy::new(|| {
    RuleSet::new(&[
        ("SM_CONTEXT_CREATE_REQUEST", SessionEvent::PduSessionCreateRequest),
        ("SM_POLICY_ASSOCIATION_REQUEST", SessionEvent::PolicyAssociationRequest),
        ("SM_POLICY_ASSOCIATION_RESPONSE", SessionEvent::PolicyAssociationResponse),
        ("PFCP_SESSION_EST_REQUEST", SessionEvent::PfcpSessionEstablishmentRequest),
        ("PFCP_SESSION_EST_RESPONSE", SessionEvent::PfcpSessionEstablishmentResponse),
        ("PDU_SESSION_EST_COMPLETE", SessionEvent::PduSessionEstComplete),
        ("PDU_SESSION_EST_REJECT", SessionEvent::PduSessionEstReject),
        ("PFCP_SESSION_EST_FAILURE", SessionEvent::PfcpSessionEstablishmentFailure),
        ("SM_POLICY_ASSOCIATION_FAILURE", SessionEvent::PolicyAssociationFailure),
    ])
});

/// `snssai=<SST>-<SD>` with a decimal SST and hex SD.
static SNSSAI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"snssai=(\d+-[0-9A-Fa-f]+)").expect("snssai pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionExtraction {
    pub kpis: SessionKpis,
    pub slices: SliceCounts,
    pub lines: usize,
    pub unmatched: usize,
}

/// Count session events, at most one per line. Completion lines that carry
/// an S-NSSAI also bump that slice's counter.
pub fn extract_session<I, S>(lines: I) -> SessionExtraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = SessionExtraction::default();
    for line in lines {
        let line = line.as_ref();
        out.lines += 1;
        let Some(event) = SESSION_RULES.first_match(line) else {
            out.unmatched += 1;
            continue;
        };
        out.kpis.increment(event);
        if event == SessionEvent::PduSessionEstComplete {
            if let Some(slice) = slice_descriptor(line) {
                *out.slices.entry(slice.to_string()).or_insert(0) += 1;
            }
        }
    }
    out
}

/// The first embedded `snssai=<SST>-<SD>` descriptor in `line`, if any.
pub fn slice_descriptor(line: &str) -> Option<&str> {
    SNSSAI
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
