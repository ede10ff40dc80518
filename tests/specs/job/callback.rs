//! A submitted workload reporting back through its callback.
//!
//! The Job's container command is executed locally with stub `uv` and `curl`
//! binaries on `PATH`, and `secretKeyRef` env resolved from an in-memory
//! Secret store the way the kubelet would. The payload the stub `curl`
//! receives is then delivered to the daemon as the real one would be.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::prelude::*;

const SECRET: &str = "s3cret";

/// `(secret name, key, value)` entries visible to workloads.
type SecretStore<'a> = &'a [(&'a str, &'a str, &'a str)];

fn stub(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

struct Delivery {
    exit_code: Option<i32>,
    payload: Value,
    secret: Option<String>,
    url: String,
}

/// Run the last submitted Job locally with a stub tool exiting `tool_exit`.
async fn run_last_job(daemon: &Daemon, tool_exit: i32, secrets: SecretStore<'_>) -> Delivery {
    let bin = tempfile::tempdir().unwrap();
    stub(bin.path(), "uv", &format!("exit {tool_exit}"));
    stub(bin.path(), "curl", "for arg in \"$@\"; do printf '%s\\n' \"$arg\" >> \"$0.log\"; done");

    let job = daemon.submitter.last_job().unwrap();
    let command = container_command(&job).unwrap().to_vec();
    let container = &job.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0];

    let path = format!("{}:{}", bin.path().display(), std::env::var("PATH").unwrap_or_default());
    let mut cmd = tokio::process::Command::new(&command[0]);
    cmd.args(&command[1..]).env("PATH", path);
    for var in container.env.as_ref().unwrap() {
        if let Some(ref value) = var.value {
            cmd.env(&var.name, value);
            continue;
        }
        let Some(selector) = var.value_from.as_ref().and_then(|v| v.secret_key_ref.as_ref()) else {
            continue;
        };
        let resolved = secrets
            .iter()
            .find(|(name, key, _)| *name == selector.name && *key == selector.key)
            .map(|(_, _, value)| *value);
        if let Some(value) = resolved {
            cmd.env(&var.name, value);
        }
    }
    let output = cmd.output().await.unwrap();

    let log = std::fs::read_to_string(bin.path().join("curl.log")).unwrap();
    let args: Vec<&str> = log.lines().collect();
    let after = |flag: &str| args.iter().position(|a| *a == flag).map(|i| args[i + 1]);

    let secret = args
        .windows(2)
        .filter(|w| w[0] == "-H")
        .find_map(|w| w[1].strip_prefix(&format!("{CALLBACK_SECRET_HEADER}: ")))
        .map(str::to_string);

    Delivery {
        exit_code: output.status.code(),
        payload: serde_json::from_str(after("--data").unwrap()).unwrap(),
        secret,
        url: args.last().unwrap().to_string(),
    }
}

#[tokio::test]
async fn failed_workload_reports_failure_and_keeps_exit_code() {
    let daemon = Daemon::start_with(|c| c.callback_secret = Some(SECRET.to_string()));
    let name = daemon
        .create_job(json!({
            "phase": "migrate",
            "name": "demo",
            "description": "x",
            "moduleName": "webserver",
        }))
        .await;

    let job = daemon.submitter.last_job().unwrap();
    assert!(!serde_json::to_string(&job).unwrap().contains(SECRET));

    let secrets = [("x2a-secrets", "callback-secret", SECRET)];
    let delivery = run_last_job(&daemon, 7, &secrets).await;
    assert_eq!(delivery.secret.as_deref(), Some(SECRET));
    assert_eq!(delivery.exit_code, Some(7));
    assert_eq!(delivery.url, CALLBACK_URL);
    assert_eq!(delivery.payload["jobName"], name.as_str());
    assert_eq!(delivery.payload["phase"], "migrate");
    assert_eq!(delivery.payload["status"], "failure");

    let (status, _) = daemon
        .post_with_secret(
            "/api/collectArtifacts",
            &delivery.payload,
            delivery.secret.as_deref(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, entry) = daemon.get(&format!("/api/artifacts/{name}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "failure");
    assert!(entry["collectedAt"].is_string());
}

#[tokio::test]
async fn successful_workload_reports_success() {
    let daemon = Daemon::start();
    let name =
        daemon.create_job(json!({"phase": "init", "name": "estate", "description": "plan"})).await;

    let delivery = run_last_job(&daemon, 0, &[]).await;
    assert_eq!(delivery.exit_code, Some(0));
    assert_eq!(delivery.payload["status"], "success");
    assert!(delivery.secret.is_none());

    let (status, body) = daemon.post("/api/collectArtifacts", &delivery.payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobName"], name.as_str());
}
