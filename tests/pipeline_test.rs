use anyhow::Result;
use core_kpi::extract::{extract_mobility, extract_session};
use core_kpi::ingest::run_ingest;
use core_kpi::rates::mobility_rates;
use core_kpi::synth::{write_sample_logs, SamplePlan};
use core_kpi::{KpiService, KpiStore};

#[test]
fn test_sample_logs_end_to_end() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let files = write_sample_logs(&dir.path().join("logs"), 11, &SamplePlan::default())?;
    let store = KpiStore::open(dir.path().join("db").join("5g_kpis.db"))?;

    let report = run_ingest(&store, &files.amf_log, &files.smf_log)?;
    assert_eq!(report.mobility.lines, files.amf_lines);
    assert_eq!(report.mobility.unmatched, 0);
    assert_eq!(report.session.unmatched, 0);

    // 165 + 78 + 63 registrations complete, 10 are rejected.
    let mobility = store.mobility_totals()?;
    assert_eq!(mobility.registration_request, 316);
    assert_eq!(mobility.registration_success, 306);
    assert_eq!(mobility.registration_reject, 10);
    assert_eq!(mobility.authentication_failure, 156);
    assert_eq!(mobility.authentication_retry, 156);

    let session = store.session_totals()?;
    assert_eq!(session.pdu_session_create_request, 323);
    assert_eq!(session.pdu_session_est_complete, 246);
    assert_eq!(session.pdu_session_est_reject, 77);
    assert_eq!(session.pfcp_session_establishment_failure, 32);
    assert_eq!(session.policy_association_failure, 45);

    let service = KpiService::new(store);
    let slices = service.slices()?;
    assert_eq!(slices["eMBB"].sessions, 145);
    assert_eq!(slices["URLLC"].sessions, 58);
    assert_eq!(slices["mMTC"].sessions, 43);

    let summary = service.summary()?;
    assert_eq!(summary.registered_ues, 306);
    assert_eq!(summary.registration_success_rate, 96.84);
    Ok(())
}

#[test]
fn test_stored_totals_match_direct_extraction() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let plan = SamplePlan::default();
    let files = write_sample_logs(dir.path(), 3, &plan)?;
    let store = KpiStore::open(dir.path().join("kpis.db"))?;
    run_ingest(&store, &files.amf_log, &files.smf_log)?;

    let amf_lines = core_kpi::log_reader::read_log(&files.amf_log)?;
    let smf_lines = core_kpi::log_reader::read_log(&files.smf_log)?;
    let direct = extract_mobility(&amf_lines).kpis;
    assert_eq!(store.mobility_totals()?, direct);
    assert_eq!(store.session_totals()?, extract_session(&smf_lines).kpis);
    assert_eq!(
        mobility_rates(&store.mobility_totals()?),
        mobility_rates(&direct)
    );
    Ok(())
}

#[test]
fn test_repeated_ingestion_is_monotonic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let files = write_sample_logs(dir.path(), 9, &SamplePlan::default())?;
    let store = KpiStore::open(dir.path().join("kpis.db"))?;

    let mut previous = 0;
    for _ in 0..3 {
        run_ingest(&store, &files.amf_log, &files.smf_log)?;
        let total = store.mobility_totals()?.total();
        assert!(total > previous);
        previous = total;
    }
    assert_eq!(store.sum_by_slice()?["1-010203"], 3 * 145);
    Ok(())
}
