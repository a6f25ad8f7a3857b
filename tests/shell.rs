//! Shell round trips through real files.

use std::io::Write;

use chrono::DateTime;
use ir_tracker::{RecordsTab, Role, Session, SessionUser, Snapshot, TrackerConfig};
use pretty_assertions::assert_eq;
use request_engine::{apply_filters_with, compute_stats, group_by_project, EvalContext, TypeFilter};
use tempfile::{tempdir, NamedTempFile};

const SNAPSHOT: &str = r#"{
    "irs": [
        {"irNo": "BADYA-CON-D1-IR-ST-001", "project": "D1", "department": "Civil",
         "user": "ahmed", "desc": "Columns axis A", "sentAt": "17-Oct-26 09:15 AM"},
        {"irNo": "BADYA-CON-D1-CPR-ST-001", "requestType": "CPR", "project": "D1",
         "department": "Civil", "user": "sara", "isDone": true, "sentAt": "18-Oct-26 07:40 AM"},
        {"irNo": "BADYA-CON-D2-IR-ARCH-004", "project": "D2", "department": "Architectural",
         "user": "ahmed", "sentAt": "01-Sep-26 11:00 AM"}
    ],
    "revs": [
        {"revNo": "REV-D1-CPRREV-001", "irNo": "BADYA-CON-D1-CPR-ST-001", "isCPRRevision": true,
         "userRevNumber": "R1", "project": "D1", "department": "Civil", "user": "sara",
         "revNote": "level changed", "sentAt": "18-Oct-26 10:05 AM"}
    ],
    "archive": [
        {"irNo": "BADYA-CON-D1-IR-ST-000", "project": "D1", "department": "Civil", "user": "ahmed",
         "isDone": true, "archivedBy": "engineer", "archivedAt": "2026-10-12T09:00:00+02:00"}
    ]
}"#;

fn ctx() -> EvalContext {
    EvalContext::at(DateTime::parse_from_rfc3339("2026-10-18T12:00:00+02:00").unwrap())
}

#[test]
fn test_config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api_base_url: https://tracker.example.com/api\npoll_interval_secs: 15").unwrap();

    let config = TrackerConfig::load(file.path()).unwrap();
    assert_eq!(config.poll_interval_secs, 15);
    assert_eq!(config.recent_activity_limit, 10);

    let missing = TrackerConfig::load("/nonexistent/tracker.yaml").unwrap_err();
    assert_eq!(missing.code(), "IO");
}

#[test]
fn test_sample_config_is_valid() {
    let config = TrackerConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/tracker.yaml")).unwrap();
    assert_eq!(config, TrackerConfig::default());
}

#[test]
fn test_session_store_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    assert_eq!(Session::load(&path).unwrap(), Session::default());

    let session = Session::signed_in(SessionUser {
        username: "ahmed".into(),
        role: Role::Engineer,
        department: "Civil".into(),
    });
    session.store(&path).unwrap();
    assert_eq!(Session::load(&path).unwrap(), session);
}

#[test]
fn test_snapshot_views() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    let snapshot = Snapshot::load(file.path()).unwrap();
    let records = snapshot.all();
    assert_eq!(records.len(), 5);

    let session = Session::signed_in(SessionUser {
        username: "ahmed".into(),
        role: Role::Engineer,
        department: "Civil/Structure".into(),
    });

    let mine = apply_filters_with(&records, &session.scope(RecordsTab::Personal), "", &ctx());
    assert_eq!(mine.len(), 3);

    let dept = apply_filters_with(&records, &session.scope(RecordsTab::Department), "", &ctx());
    let groups = group_by_project(&dept);
    assert_eq!(groups.projects().collect::<Vec<_>>(), vec!["D1"]);
    assert_eq!(groups.record_count(), 4);

    let cpr = apply_filters_with(
        &records,
        &session.scope(RecordsTab::All).with_type(TypeFilter::Cpr),
        "",
        &ctx(),
    );
    let ids: Vec<&str> = cpr.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["BADYA-CON-D1-CPR-ST-001", "REV-D1-CPRREV-001"]);

    let archive = compute_stats(&snapshot.archive);
    assert_eq!((archive.total, archive.archived_by_engineer), (1, 1));

    let hits = apply_filters_with(&records, &Default::default(), "LEVEL", &ctx());
    assert_eq!(hits.len(), 1);
}
