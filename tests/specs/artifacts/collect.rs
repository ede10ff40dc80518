//! Receiving completion reports and reading them back

use crate::prelude::*;

#[tokio::test]
async fn failure_without_timestamp_gets_server_times() {
    let daemon = Daemon::start();
    let (status, _) = daemon
        .post(
            "/api/collectArtifacts",
            &json!({"jobName": "x2a-migrate-demo-abc", "phase": "migrate", "status": "failure"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, entry) = daemon.get("/api/artifacts/x2a-migrate-demo-abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "failure");
    for field in ["timestamp", "collectedAt"] {
        let raw = entry[field].as_str().unwrap_or_else(|| panic!("{field} missing: {entry}"));
        chrono::DateTime::parse_from_rfc3339(raw).unwrap();
    }
}

#[tokio::test]
async fn empty_ledger_reads_empty() {
    let daemon = Daemon::start();

    let (status, body) = daemon.get("/api/artifacts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = daemon.get("/api/artifacts/x2a-init-demo-abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = daemon.delete("/api/artifacts").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn duplicate_delivery_keeps_first_report() {
    let daemon = Daemon::start();
    for status in ["failure", "success"] {
        daemon
            .post(
                "/api/collectArtifacts",
                &json!({"jobName": "x2a-analyze-demo-abc", "phase": "analyze", "status": status}),
            )
            .await;
    }

    let (_, all) = daemon.get("/api/artifacts").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, entry) = daemon.get("/api/artifacts/x2a-analyze-demo-abc").await;
    assert_eq!(entry["status"], "failure");
}

#[tokio::test]
async fn configured_secret_gates_callbacks() {
    let daemon = Daemon::start_with(|c| c.callback_secret = Some("s3cret".to_string()));
    let report = json!({"jobName": "x2a-init-demo-abc", "phase": "init", "status": "success"});

    let (status, _) = daemon.post("/api/collectArtifacts", &report).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        daemon.post_with_secret("/api/collectArtifacts", &report, Some("s3cret")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn clear_then_collect() {
    let daemon = Daemon::start();
    let report = json!({"jobName": "x2a-init-demo-abc", "phase": "init", "status": "success"});
    daemon.post("/api/collectArtifacts", &report).await;

    let (status, _) = daemon.delete("/api/artifacts").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, all) = daemon.get("/api/artifacts").await;
    assert_eq!(all, json!([]));

    daemon.post("/api/collectArtifacts", &report).await;
    let (_, all) = daemon.get("/api/artifacts").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}
