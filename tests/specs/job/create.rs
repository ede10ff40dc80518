//! Creating jobs through `POST /api/jobs`

use crate::prelude::*;

fn job_args(daemon: &Daemon) -> Vec<String> {
    let job = daemon.submitter.last_job().unwrap();
    container_command(&job).unwrap().to_vec()
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[tokio::test]
async fn migrate_job_applies_defaults() {
    let daemon = Daemon::start();
    let name = daemon
        .create_job(json!({
            "phase": "migrate",
            "name": "demo",
            "description": "x",
            "moduleName": "webserver",
        }))
        .await;

    assert_identity(&name, "migrate", "demo");
    assert_eq!(name, format!("x2a-migrate-demo-{}", to_base36(daemon.clock.epoch_ms())));

    let args = job_args(&daemon);
    assert!(has_pair(&args, "--source-technology", "Chef"), "{args:?}");
    assert!(has_pair(&args, "--module-migration-plan", "migration-plan-webserver.md"));
    assert!(has_pair(&args, "--high-level-migration-plan", "migration-plan.md"));
    assert_eq!(args.last().map(String::as_str), Some("Convert webserver"));
}

#[tokio::test]
async fn every_phase_gets_its_own_command() {
    let daemon = Daemon::start();
    let requests = [
        ("init", json!({"phase": "init", "name": "estate", "description": "plan"})),
        (
            "analyze",
            json!({"phase": "analyze", "name": "estate", "description": "look", "moduleName": "db"}),
        ),
        (
            "migrate",
            json!({"phase": "migrate", "name": "estate", "description": "x", "moduleName": "db"}),
        ),
        (
            "publish",
            json!({
                "phase": "publish",
                "name": "estate",
                "description": "x",
                "moduleName": "db",
                "githubOwner": "acme",
            }),
        ),
    ];

    for (phase, request) in requests {
        let name = daemon.create_job(request).await;
        assert_identity(&name, phase, "estate");

        let args = job_args(&daemon);
        let tool = args.iter().position(|a| a == "app.py").unwrap();
        assert_eq!(args[tool + 1], phase);
    }
    assert_eq!(daemon.submitter.jobs().len(), 4);
}

#[tokio::test]
async fn hostile_values_stay_single_arguments() {
    let daemon = Daemon::start();
    let description = "x\"; rm -rf / #$(reboot)";
    daemon.create_job(json!({"phase": "init", "name": "demo", "description": description})).await;

    let args = job_args(&daemon);
    assert_eq!(args.last().map(String::as_str), Some(description));
    // The wrapper script itself never contains request values
    assert!(!args[2].contains("reboot"));
}

#[tokio::test]
async fn identity_is_bounded_and_substrate_safe() {
    let daemon = Daemon::start();
    let name = daemon
        .create_job(json!({
            "phase": "publish",
            "name": "Ünïcode & Spaces / A Very Long Human Label That Keeps Going And Going",
            "description": "x",
            "moduleName": "web",
            "githubOwner": "acme",
        }))
        .await;

    assert!(name.len() <= 63, "{name}");
    assert!(name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-'));
    assert!(!name.ends_with('-'));
}

#[tokio::test]
async fn same_tick_duplicates_collide_unless_disambiguated() {
    let request = json!({"phase": "init", "name": "demo", "description": "x"});

    let daemon = Daemon::start();
    daemon.create_job(request.clone()).await;
    let (status, _) = daemon.post("/api/jobs", &request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let daemon = Daemon::start_with(|c| c.disambiguate_names = true);
    let a = daemon.create_job(request.clone()).await;
    let b = daemon.create_job(request).await;
    assert_ne!(a, b);
}

#[tokio::test]
async fn minimal_profile_submits_bare_command() {
    let daemon = Daemon::start_with(|c| {
        c.profile = DeploymentProfile::Minimal;
        c.inline_credentials = vec![("LLM_MODEL".to_string(), "gpt-4o".to_string())];
    });
    daemon.create_job(json!({"phase": "init", "name": "demo", "description": "x"})).await;

    let args = job_args(&daemon);
    assert_eq!(args[0], "uv");
    assert!(!args.iter().any(|a| a == "/bin/sh"));
}
