//! Synthetic AMF and SMF procedure logs for demos and tests.
//!
//! AMF logs are JSON lines carrying an `event_name`; SMF logs are
//! `key=value` lines carrying `step=<STEP>` and `snssai=<SST>-<SD>`.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFlow {
    Success,
    /// Authentication fails and is retried `retries` times before succeeding.
    AuthRetry { retries: u32 },
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Success,
    PfcpFailure,
    PolicyFailure,
}

const SESSION_SUCCESS_STEPS: &[&str] = &[
    "SM_CONTEXT_CREATE_REQUEST",
    "SM_POLICY_ASSOCIATION_REQUEST",
    "SM_POLICY_ASSOCIATION_RESPONSE",
    "PFCP_SESSION_EST_REQUEST",
    "PFCP_SESSION_EST_RESPONSE",
    "PDU_SESSION_EST_COMPLETE",
];

const PFCP_FAILURE_STEPS: &[&str] = &[
    "SM_CONTEXT_CREATE_REQUEST",
    "SM_POLICY_ASSOCIATION_REQUEST",
    "SM_POLICY_ASSOCIATION_RESPONSE",
    "PFCP_SESSION_EST_REQUEST",
    "PFCP_SESSION_EST_FAILURE",
    "PDU_SESSION_EST_REJECT",
];

const POLICY_FAILURE_STEPS: &[&str] = &[
    "SM_CONTEXT_CREATE_REQUEST",
    "SM_POLICY_ASSOCIATION_REQUEST",
    "SM_POLICY_ASSOCIATION_FAILURE",
    "PDU_SESSION_EST_REJECT",
];

pub struct LogGenerator {
    rng: StdRng,
    clock: DateTime<Utc>,
    log_id: u64,
}

impl LogGenerator {
    pub fn new(seed: u64, start: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: start,
            log_id: 1,
        }
    }

    fn short_id(&mut self, len: usize) -> String {
        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        id.simple().to_string()[..len].to_string()
    }

    fn tick(&mut self, latency_ms: i64) -> String {
        self.clock += Duration::milliseconds(latency_ms);
        self.clock.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// One registration procedure as AMF JSON lines.
    pub fn amf_registration(&mut self, flow: RegistrationFlow) -> Vec<String> {
        let procedure_id = format!("reg-{}", self.short_id(6));
        let ue_id = format!("imsi-00101{}", self.rng.gen_range(100_000_000u64..=999_999_999));
        let ran_id = format!("gnb-{}", self.rng.gen_range(100..=199));

        let mut steps: Vec<(&str, &str, u32, Option<&str>)> = vec![("registration_request", "SUCCESS", 0, None)];
        match flow {
            RegistrationFlow::Success => {
                steps.push(("authentication_request", "SUCCESS", 0, None));
                steps.push(("authentication_success", "SUCCESS", 0, None));
                steps.push(("registration_complete", "SUCCESS", 0, None));
            }
            RegistrationFlow::AuthRetry { retries } => {
                steps.push(("authentication_request", "SUCCESS", 0, None));
                for retry in 1..=retries {
                    steps.push(("authentication_failure", "FAILURE", retry, Some("AUTH_REJECT")));
                    steps.push(("authentication_retry", "RETRY", retry, None));
                }
                steps.push(("authentication_success", "SUCCESS", 0, None));
                steps.push(("registration_complete", "SUCCESS", 0, None));
            }
            RegistrationFlow::Reject => {
                steps.push(("registration_reject", "FAILURE", 0, None));
            }
        }

        let mut lines = Vec::with_capacity(steps.len());
        for (event, result, retry_count, error_code) in steps {
            let latency = self.rng.gen_range(3..=18);
            let timestamp = self.tick(latency);
            let line = json!({
                "log_id": self.log_id,
                "timestamp": timestamp,
                "nf_type": "AMF",
                "procedure": "registration",
                "procedure_id": procedure_id,
                "event_name": event,
                "retry_count": retry_count,
                "ue_id": ue_id,
                "supi": ue_id,
                "ran_id": ran_id,
                "result": result,
                "latency_ms": latency,
                "error_code": error_code,
            });
            self.log_id += 1;
            lines.push(line.to_string());
        }
        lines
    }

    /// One PDU session establishment as SMF key=value lines.
    pub fn smf_session(&mut self, flow: SessionFlow, snssai: &str) -> Vec<String> {
        let proc_id = format!("SMF-PDU-{}", self.short_id(8));
        let supi = format!("imsi-00101{:09}", self.rng.gen_range(0u64..1_000_000_000));

        let (steps, failed_step, cause) = match flow {
            SessionFlow::Success => (SESSION_SUCCESS_STEPS, None, None),
            SessionFlow::PfcpFailure => (
                PFCP_FAILURE_STEPS,
                Some("PFCP_SESSION_EST_FAILURE"),
                Some("PFCP_TIMEOUT"),
            ),
            SessionFlow::PolicyFailure => (
                POLICY_FAILURE_STEPS,
                Some("SM_POLICY_ASSOCIATION_FAILURE"),
                Some("POLICY_ASSOCIATION_FAILURE"),
            ),
        };

        let mut lines = Vec::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            let seq = i + 1;
            let latency = 10 + seq as i64 * 2;
            let timestamp = self.tick(latency);
            let failed = failed_step == Some(*step);
            let (level, result) = if failed { ("ERROR", "FAILURE") } else { ("INFO", "SUCCESS") };
            let mut line = format!(
                "{} SMF {} PDU_SESSION_EST proc_id={} step={} step_seq={} supi={} pdu_id=1 dnn=internet snssai={} result={}",
                timestamp, level, proc_id, step, seq, supi, snssai, result
            );
            if let (true, Some(cause)) = (failed, cause) {
                line.push_str(&format!(" cause={}", cause));
            }
            line.push_str(&format!(" latency={}ms", latency));
            lines.push(line);
        }
        lines
    }
}

/// Flow mix written by [`write_sample_logs`].
#[derive(Debug, Clone)]
pub struct SamplePlan {
    pub registrations: Vec<(RegistrationFlow, usize)>,
    pub sessions: Vec<(SessionFlow, &'static str, usize)>,
}

impl Default for SamplePlan {
    fn default() -> Self {
        Self {
            registrations: vec![
                (RegistrationFlow::Success, 165),
                (RegistrationFlow::AuthRetry { retries: 2 }, 78),
                (RegistrationFlow::Success, 63),
                (RegistrationFlow::Reject, 10),
            ],
            sessions: vec![
                (SessionFlow::Success, "1-010203", 145),
                (SessionFlow::PfcpFailure, "1-010203", 32),
                (SessionFlow::Success, "2-020304", 58),
                (SessionFlow::PolicyFailure, "1-010203", 45),
                (SessionFlow::Success, "3-030405", 43),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleFiles {
    pub amf_log: PathBuf,
    pub smf_log: PathBuf,
    pub amf_lines: usize,
    pub smf_lines: usize,
}

/// Write `amf.log` and `smf.log` under `out_dir`, replacing existing files.
pub fn write_sample_logs(out_dir: &Path, seed: u64, plan: &SamplePlan) -> Result<SampleFiles> {
    fs::create_dir_all(out_dir)?;
    let mut generator = LogGenerator::new(seed, Utc::now());

    let amf_log = out_dir.join("amf.log");
    let mut amf = fs::File::create(&amf_log)?;
    let mut amf_lines = 0;
    for (flow, count) in &plan.registrations {
        for _ in 0..*count {
            for line in generator.amf_registration(*flow) {
                writeln!(amf, "{}", line)?;
                amf_lines += 1;
            }
        }
    }

    let smf_log = out_dir.join("smf.log");
    let mut smf = fs::File::create(&smf_log)?;
    let mut smf_lines = 0;
    for (flow, snssai, count) in &plan.sessions {
        for _ in 0..*count {
            for line in generator.smf_session(*flow, snssai) {
                writeln!(smf, "{}", line)?;
                smf_lines += 1;
            }
        }
    }

    info!(amf_lines, smf_lines, dir = %out_dir.display(), "sample logs written");
    Ok(SampleFiles {
        amf_log,
        smf_log,
        amf_lines,
        smf_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_mobility, extract_session};

    fn generator() -> LogGenerator {
        LogGenerator::new(7, Utc::now())
    }

    #[test]
    fn test_retry_flow_counts() {
        let lines = generator().amf_registration(RegistrationFlow::AuthRetry { retries: 2 });
        let kpis = extract_mobility(&lines).kpis;
        assert_eq!(kpis.registration_request, 1);
        assert_eq!(kpis.authentication_failure, 2);
        assert_eq!(kpis.authentication_retry, 2);
        assert_eq!(kpis.registration_success, 1);
    }

    #[test]
    fn test_amf_lines_are_json() {
        let lines = generator().amf_registration(RegistrationFlow::Reject);
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(v["event_name"], "registration_reject");
        assert_eq!(v["nf_type"], "AMF");
    }

    #[test]
    fn test_smf_success_flow_tags_slice() {
        let lines = generator().smf_session(SessionFlow::Success, "2-020304");
        let out = extract_session(&lines);
        assert_eq!(out.kpis.pdu_session_est_complete, 1);
        assert_eq!(out.slices.get("2-020304"), Some(&1));
        assert_eq!(out.unmatched, 0);
    }

    #[test]
    fn test_smf_failure_flows() {
        let mut g = generator();
        let pfcp = extract_session(g.smf_session(SessionFlow::PfcpFailure, "1-010203")).kpis;
        assert_eq!(pfcp.pfcp_session_establishment_failure, 1);
        assert_eq!(pfcp.pdu_session_est_reject, 1);

        let lines = g.smf_session(SessionFlow::PolicyFailure, "1-010203");
        assert!(lines[2].contains("cause=POLICY_ASSOCIATION_FAILURE"));
        let policy = extract_session(&lines).kpis;
        assert_eq!(policy.policy_association_failure, 1);
        assert_eq!(policy.pdu_session_est_complete, 0);
    }

    #[test]
    fn test_same_seed_same_ids() {
        let start = Utc::now();
        let a = LogGenerator::new(42, start).smf_session(SessionFlow::Success, "1-010203");
        let b = LogGenerator::new(42, start).smf_session(SessionFlow::Success, "1-010203");
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_sample_logs() {
        let dir = tempfile::tempdir().unwrap();
        let plan = SamplePlan {
            registrations: vec![(RegistrationFlow::Success, 2)],
            sessions: vec![(SessionFlow::Success, "1-010203", 3)],
        };
        let files = write_sample_logs(dir.path(), 1, &plan).unwrap();
        assert_eq!(files.amf_lines, 8);
        assert_eq!(files.smf_lines, 18);
        assert!(files.amf_log.exists());
    }
}
