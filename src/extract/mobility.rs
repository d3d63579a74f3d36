//! Registration and authentication events from AMF logs.

use once_cell::sync::Lazy;

use super::RuleSet;
use crate::kpi::{MobilityEvent, MobilityKpis};

/// Tie-break order matters: a line naming two events counts only as the
/// first one listed here.
static MOBILITY_RULES: Lazy<RuleSet<MobilityEvent>> = Lazy::new(|| {
    RuleSet::new(&[
        ("registration_request", MobilityEvent::RegistrationRequest),
        ("registration_complete", MobilityEvent::RegistrationSuccess),
        ("authentication_request", MobilityEvent::AuthenticationRequest),
        ("authentication_success", MobilityEvent::AuthenticationSuccess),
        ("authentication_failure", MobilityEvent::AuthenticationFailure),
        ("authentication_retry", MobilityEvent::AuthenticationRetry),
        ("registration_reject", MobilityEvent::RegistrationReject),
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobilityExtraction {
    pub kpis: MobilityKpis,
    pub lines: usize,
    pub unmatched: usize,
}

/// Count mobility events, at most one per line.
pub fn extract_mobility<I, S>(lines: I) -> MobilityExtraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = MobilityExtraction::default();
    for line in lines {
        out.lines += 1;
        match MOBILITY_RULES.first_match(line.as_ref()) {
            Some(event) => out.kpis.increment(event),
            None => out.unmatched += 1,
        }
    }
    out
}
