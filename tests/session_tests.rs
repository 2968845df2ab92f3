//! End-to-end session tests over a scripted page source

use std::fs;
use std::path::PathBuf;

use floorsheet_collector::test_utils::ScriptedPageSource;
use floorsheet_collector::{
    FloorSheetRecord, RawRow, SessionConfig, SessionError, SessionOutcome, run_session,
};
use tempfile::TempDir;

fn row(cells: &[&str]) -> RawRow {
    ScriptedPageSource::row(cells)
}

fn test_config(dir: &TempDir) -> SessionConfig {
    SessionConfig {
        storage_path: dir.path().join("floorsheet.json"),
        post_filter_delay_ms: 0,
        page_settle_delay_ms: 0,
        session_deadline_secs: 60,
        ..SessionConfig::default()
    }
}

fn persisted_contracts(path: &PathBuf) -> Vec<String> {
    let raw = fs::read_to_string(path).unwrap();
    let records: Vec<FloorSheetRecord> = serde_json::from_str(&raw).unwrap();
    records.into_iter().map(|r| r.contract_no).collect()
}

#[tokio::test]
async fn completed_session_persists_every_unique_record() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut source = ScriptedPageSource::new(vec![
        vec![row(&["1", "C-1", "NABIL"]), row(&["2", "C-2", "NICA"])],
        vec![row(&["3", "C-3", "SCB"])],
    ]);

    let report = run_session(&mut source, &config).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.records_appended, 3);
    assert_eq!(report.records_total, 3);
    assert!(report.finished_at >= report.started_at);
    assert_eq!(persisted_contracts(&config.storage_path), ["C-1", "C-2", "C-3"]);
}

#[tokio::test]
async fn session_resumes_from_prior_store_without_loss_or_duplication() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    // First run collects pages 1-2.
    let mut first = ScriptedPageSource::new(vec![
        vec![row(&["1", "C-1", "NABIL"])],
        vec![row(&["2", "C-2", "NICA"])],
    ]);
    run_session(&mut first, &config).await.unwrap();

    // Second run sees the same data plus one new page.
    let mut second = ScriptedPageSource::new(vec![
        vec![row(&["1", "C-1", "NABIL"])],
        vec![row(&["2", "C-2", "NICA"])],
        vec![row(&["3", "C-3", "SCB"])],
    ]);
    let report = run_session(&mut second, &config).await.unwrap();

    assert_eq!(report.records_appended, 1);
    assert_eq!(report.records_total, 3);
    // Original records first, new records in first-seen order after them.
    assert_eq!(persisted_contracts(&config.storage_path), ["C-1", "C-2", "C-3"]);
}

#[tokio::test]
async fn duplicate_and_total_rows_never_reach_the_artifact() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    // Prior store already holds A1.
    let prior = vec![FloorSheetRecord::from_cells(&[
        "1".to_owned(),
        "A1".to_owned(),
        "NABIL".to_owned(),
        "34".to_owned(),
        "57".to_owned(),
        "10".to_owned(),
        "500.00".to_owned(),
        "5000.00".to_owned(),
    ])];
    fs::write(
        &config.storage_path,
        serde_json::to_string_pretty(&prior).unwrap(),
    )
    .unwrap();

    let mut source = ScriptedPageSource::new(vec![
        vec![
            row(&["1", "A1", "REFRESHED"]),
            row(&["2", "A2", "NICA"]),
            row(&["Total Amount: 1,234,567.00"]),
        ],
        vec![row(&["1", "A3", "SCB"])],
    ]);

    let report = run_session(&mut source, &config).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.records_appended, 2);
    assert_eq!(persisted_contracts(&config.storage_path), ["A1", "A2", "A3"]);

    // A1 is the loaded copy, untouched by the duplicate row on page 1.
    let raw = fs::read_to_string(&config.storage_path).unwrap();
    let records: Vec<FloorSheetRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(records[0], prior[0]);
}

#[tokio::test]
async fn malformed_prior_state_aborts_before_any_scraping() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    fs::write(&config.storage_path, "this is not json").unwrap();

    let mut source = ScriptedPageSource::new(vec![vec![row(&["1", "C-1", "NABIL"])]]);
    let err = run_session(&mut source, &config).await.unwrap_err();

    assert!(matches!(err, SessionError::PriorState(_)));
    // The page source was never touched.
    assert_eq!(source.filter_submits, 0);
    assert_eq!(source.fetches, 0);
    // The broken artifact is left for the operator to inspect.
    assert_eq!(
        fs::read_to_string(&config.storage_path).unwrap(),
        "this is not json"
    );
}

#[tokio::test]
async fn extraction_failure_persists_partial_data_then_propagates() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut source = ScriptedPageSource::failing_at(
        vec![
            vec![row(&["1", "C-1", "NABIL"])],
            vec![row(&["2", "C-2", "NICA"])],
            vec![row(&["3", "C-3", "SCB"])],
        ],
        2,
    );

    let err = run_session(&mut source, &config).await.unwrap_err();

    match err {
        SessionError::Extraction { page, .. } => assert_eq!(page, 2),
        other => panic!("expected extraction error, got {other:?}"),
    }
    // Page 1 was saved before the error propagated.
    assert_eq!(persisted_contracts(&config.storage_path), ["C-1"]);
}

#[tokio::test]
async fn empty_dataset_persists_an_empty_artifact() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut source = ScriptedPageSource::new(vec![vec![]]);

    let report = run_session(&mut source, &config).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.records_total, 0);
    assert!(persisted_contracts(&config.storage_path).is_empty());
}
