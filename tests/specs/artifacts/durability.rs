//! Ledger contents across restarts and damaged files

use std::io::Write;

use crate::prelude::*;

fn report(job_name: &str) -> Value {
    json!({"jobName": job_name, "phase": "migrate", "status": "success"})
}

#[tokio::test]
async fn entries_survive_restart() {
    let daemon = Daemon::start();
    daemon.post("/api/collectArtifacts", &report("x2a-migrate-a-1")).await;
    daemon.post("/api/collectArtifacts", &report("x2a-migrate-b-2")).await;

    let daemon = daemon.restart();
    let (_, all) = daemon.get("/api/artifacts").await;
    let names: Vec<_> = all.as_array().unwrap().iter().map(|e| e["jobName"].clone()).collect();
    assert_eq!(names, vec![json!("x2a-migrate-a-1"), json!("x2a-migrate-b-2")]);
}

#[tokio::test]
async fn torn_write_does_not_poison_reads() {
    let daemon = Daemon::start();
    daemon.post("/api/collectArtifacts", &report("x2a-migrate-a-1")).await;

    // A crash mid-append leaves a partial line behind
    let mut file =
        std::fs::OpenOptions::new().append(true).open(&daemon.config.ledger_path).unwrap();
    file.write_all(br#"{"jobName":"x2a-migrate-b-2","pha"#).unwrap();
    drop(file);

    let daemon = daemon.restart();
    let (status, all) = daemon.get("/api/artifacts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = daemon.post("/api/collectArtifacts", &report("x2a-migrate-c-3")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = daemon.get("/api/artifacts").await;
    let names: Vec<_> = all.as_array().unwrap().iter().map(|e| e["jobName"].clone()).collect();
    assert_eq!(names, vec![json!("x2a-migrate-a-1"), json!("x2a-migrate-c-3")]);
}

#[tokio::test]
async fn one_record_per_line() {
    let daemon = Daemon::start();
    for i in 0..3 {
        daemon.post("/api/collectArtifacts", &report(&format!("x2a-migrate-m{i}-abc"))).await;
    }

    let content = std::fs::read_to_string(&daemon.config.ledger_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value: Value = serde_json::from_str(line).unwrap();
        assert!(value["collectedAt"].is_string());
    }
}
