// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn args_of(request: &JobRequest) -> Vec<String> {
    build(request).unwrap().args
}

fn publish(module: &str) -> JobRequest {
    JobRequest {
        github_owner: Some("acme".to_string()),
        ..JobRequest::new("publish", "ship", "publish").with_module(module)
    }
}

#[test]
fn init_passes_description_last() {
    let args = args_of(&JobRequest::new("init", "demo", "Plan the whole estate"));
    assert_eq!(
        args,
        vec!["run", "app.py", "init", "--source-dir", "/app/source", "Plan the whole estate"]
    );
}

#[test]
fn analyze_passes_description_then_source_dir() {
    let args = args_of(&JobRequest::new("analyze", "demo", "Look at nginx").with_module("nginx"));
    assert_eq!(args, vec!["run", "app.py", "analyze", "Look at nginx", "--source-dir", "/app/source"]);
}

#[test]
fn migrate_applies_defaults() {
    let cmd = build(&JobRequest::new("migrate", "demo", "x").with_module("webserver")).unwrap();
    assert_eq!(cmd.program, "uv");
    assert_eq!(cmd.args[2], "migrate");
    assert!(cmd.has_pair("--source-dir", "/app/source"));
    assert!(cmd.has_pair("--source-technology", "Chef"));
    assert!(cmd.has_pair("--high-level-migration-plan", "migration-plan.md"));
    assert!(cmd.has_pair("--module-migration-plan", "migration-plan-webserver.md"));
    assert_eq!(cmd.args.last().map(String::as_str), Some("Convert webserver"));
    assert!(cmd.to_shell_string().contains("--source-technology Chef"));
}

#[test]
fn migrate_honors_source_technology() {
    let request = JobRequest {
        source_technology: Some("Puppet".to_string()),
        ..JobRequest::new("migrate", "demo", "x").with_module("db")
    };
    let cmd = build(&request).unwrap();
    assert!(cmd.has_pair("--source-technology", "Puppet"));
    assert!(cmd.has_pair("--module-migration-plan", "migration-plan-db.md"));
}

#[test]
fn publish_defaults_source_path_and_branch() {
    let cmd = build(&publish("webserver")).unwrap();
    assert_eq!(&cmd.args[2..4], &["publish", "webserver"]);
    assert!(cmd.has_pair("--source-paths", "/app/source/webserver"));
    assert!(cmd.has_pair("--github-owner", "acme"));
    assert!(cmd.has_pair("--github-branch", "main"));
    assert!(!cmd.args.iter().any(|a| a == "--skip-git"));
    assert!(!cmd.args.iter().any(|a| a == "--base-path"));
}

#[test]
fn publish_with_all_options() {
    let request = JobRequest {
        github_branch: Some("release".to_string()),
        skip_git: true,
        base_path: Some("ansible".to_string()),
        collections_file: Some("requirements.yml".to_string()),
        inventory_file: Some("inventory.yml".to_string()),
        source_paths: vec!["roles/web".to_string(), "roles/db".to_string()],
        ..publish("webserver")
    };
    let args = args_of(&request);
    let tail: Vec<&str> = args.iter().skip(4).map(String::as_str).collect();
    assert_eq!(
        tail,
        vec![
            "--source-paths",
            "roles/web",
            "roles/db",
            "--github-owner",
            "acme",
            "--github-branch",
            "release",
            "--skip-git",
            "--base-path",
            "ansible",
            "--collections-file",
            "requirements.yml",
            "--inventory-file",
            "inventory.yml",
        ]
    );
}

#[test]
fn hostile_values_stay_single_arguments() {
    let description = r#"x"; rm -rf / #"#;
    let cmd = build(&JobRequest::new("init", "demo", description)).unwrap();
    assert_eq!(cmd.args.last().map(String::as_str), Some(description));
    assert!(cmd.to_shell_string().ends_with(r#"'x"; rm -rf / #'"#));
}

#[test]
fn unsupported_phase_fails() {
    let err = build(&JobRequest::new("deploy", "demo", "x")).unwrap_err();
    assert_eq!(err, RequestError::UnsupportedPhase("deploy".to_string()));
}

#[yare::parameterized(
    init    = { "init" },
    analyze = { "analyze" },
    migrate = { "migrate" },
    publish = { "publish" },
)]
fn every_phase_names_its_subcommand(phase: &str) {
    let request = JobRequest {
        github_owner: Some("acme".to_string()),
        ..JobRequest::new(phase, "demo", "x").with_module("m")
    };
    let cmd = build(&request).unwrap();
    assert_eq!(&cmd.args[..3], &["run", "app.py", phase]);
}
