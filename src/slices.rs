//! Per-slice session distribution.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::rates::percentage;

/// Standardized Slice/Service Types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceType {
    Embb,
    Urllc,
    Mmtc,
}

impl SliceType {
    pub fn from_sst(sst: u32) -> Option<Self> {
        match sst {
            1 => Some(SliceType::Embb),
            2 => Some(SliceType::Urllc),
            3 => Some(SliceType::Mmtc),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SliceType::Embb => "eMBB",
            SliceType::Urllc => "URLLC",
            SliceType::Mmtc => "mMTC",
        }
    }
}

impl fmt::Display for SliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a `"<SST>-<SD>"` identifier.
///
/// SSTs outside the standard set become `Unknown(SST=<sst>)` so they remain
/// visible in reports.
pub fn resolve_slice(slice_id: &str) -> String {
    let sst = slice_id.split('-').next().unwrap_or(slice_id);
    match sst.parse::<u32>().ok().and_then(SliceType::from_sst) {
        Some(slice_type) => slice_type.name().to_string(),
        None => format!("Unknown(SST={})", sst),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceEntry {
    pub sessions: u64,
    /// Raw identifier(s) behind this name, comma separated when several
    /// identifiers share an SST.
    pub nssai: String,
}

/// Slice report keyed by resolved slice name.
pub type SliceReport = BTreeMap<String, SliceEntry>;

/// Group per-identifier totals by resolved slice name.
pub fn slice_report(totals: &BTreeMap<String, u64>) -> SliceReport {
    let mut grouped: BTreeMap<String, (u64, Vec<&str>)> = BTreeMap::new();
    for (slice_id, sessions) in totals {
        let entry = grouped.entry(resolve_slice(slice_id)).or_default();
        entry.0 += sessions;
        entry.1.push(slice_id);
    }
    grouped
        .into_iter()
        .map(|(name, (sessions, ids))| {
            let entry = SliceEntry {
                sessions,
                nssai: ids.join(","),
            };
            (name, entry)
        })
        .collect()
}

/// Share of all sessions per slice name, in percent. Every share is 0 when
/// no sessions were recorded.
pub fn slice_shares(report: &SliceReport) -> BTreeMap<String, f64> {
    let total: u64 = report.values().map(|e| e.sessions).sum();
    report
        .iter()
        .map(|(name, entry)| (name.clone(), percentage(entry.sessions, total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve_slice("1-010203"), "eMBB");
        assert_eq!(resolve_slice("2-0a1b2c"), "URLLC");
        assert_eq!(resolve_slice("3-ffffff"), "mMTC");
        assert_eq!(resolve_slice("9-xxxx"), "Unknown(SST=9)");
    }

    #[test]
    fn test_resolve_malformed_sst_is_labelled() {
        assert_eq!(resolve_slice("abc-01"), "Unknown(SST=abc)");
    }

    #[test]
    fn test_report_entries() {
        let report = slice_report(&totals(&[("1-010203", 12), ("2-0a1b2c", 3)]));
        assert_eq!(report.len(), 2);
        assert_eq!(
            report["eMBB"],
            SliceEntry {
                sessions: 12,
                nssai: "1-010203".to_string()
            }
        );
        assert_eq!(report["URLLC"].sessions, 3);
    }

    #[test]
    fn test_identifiers_sharing_an_sst_are_merged() {
        let report = slice_report(&totals(&[("1-aaaaaa", 2), ("1-010203", 5)]));
        assert_eq!(report.len(), 1);
        assert_eq!(report["eMBB"].sessions, 7);
        assert_eq!(report["eMBB"].nssai, "1-010203,1-aaaaaa");
    }

    #[test]
    fn test_shares() {
        let report = slice_report(&totals(&[("1-010203", 3), ("3-abcdef", 1)]));
        let shares = slice_shares(&report);
        assert_eq!(shares["eMBB"], 75.0);
        assert_eq!(shares["mMTC"], 25.0);
    }

    #[test]
    fn test_shares_with_zero_sessions() {
        let report = slice_report(&totals(&[("1-010203", 0), ("2-0a1b2c", 0)]));
        let shares = slice_shares(&report);
        assert!(shares.values().all(|v| *v == 0.0));
        assert_eq!(shares.len(), 2);
    }
}
