// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command builder: maps a job request onto the conversion tool's argv.
//!
//! Pure and I/O free. Every user-supplied value becomes its own argument, so
//! descriptions and module names never pass through shell parsing.

use x2a_core::{JobRequest, PhaseRequest, PublishRequest, RequestError};

use crate::command::CommandLine;

/// Program that runs the conversion tool inside the workload image.
pub const TOOL_PROGRAM: &str = "uv";

/// Arguments placed before the phase subcommand.
pub const TOOL_PREFIX: [&str; 2] = ["run", "app.py"];

/// Source checkout inside the workload.
pub const SOURCE_DIR: &str = "/app/source";

/// High-level plan written by `init` and read by `migrate`.
pub const MIGRATION_PLAN_FILE: &str = "migration-plan.md";

pub const DEFAULT_SOURCE_TECHNOLOGY: &str = "Chef";

/// Branch used by `publish` when the caller does not pick one.
pub const DEFAULT_GITHUB_BRANCH: &str = "main";

/// Module-specific plan written by `analyze` and read by `migrate`.
pub fn module_plan_file(module_name: &str) -> String {
    format!("migration-plan-{}.md", module_name)
}

/// Validate `request` and build its command.
pub fn build(request: &JobRequest) -> Result<CommandLine, RequestError> {
    Ok(build_phase(&request.validate()?))
}

/// Build the command for an already validated request.
pub fn build_phase(request: &PhaseRequest) -> CommandLine {
    let tool = CommandLine::new(TOOL_PROGRAM, TOOL_PREFIX);
    match request {
        PhaseRequest::Init { description } => {
            tool.args(["init", "--source-dir", SOURCE_DIR]).arg(description)
        }
        PhaseRequest::Analyze { description, .. } => {
            tool.arg("analyze").arg(description).args(["--source-dir", SOURCE_DIR])
        }
        PhaseRequest::Migrate { module_name, source_technology } => tool
            .args(["migrate", "--source-dir", SOURCE_DIR, "--source-technology"])
            .arg(source_technology.as_deref().unwrap_or(DEFAULT_SOURCE_TECHNOLOGY))
            .args(["--high-level-migration-plan", MIGRATION_PLAN_FILE])
            .arg("--module-migration-plan")
            .arg(module_plan_file(module_name))
            .arg(format!("Convert {}", module_name)),
        PhaseRequest::Publish(publish) => publish_command(tool, publish),
    }
}

fn publish_command(tool: CommandLine, p: &PublishRequest) -> CommandLine {
    let source_paths = if p.source_paths.is_empty() {
        vec![format!("{}/{}", SOURCE_DIR, p.module_name)]
    } else {
        p.source_paths.clone()
    };

    let mut cmd = tool
        .arg("publish")
        .arg(&p.module_name)
        .arg("--source-paths")
        .args(source_paths)
        .args(["--github-owner", p.github_owner.as_str(), "--github-branch"])
        .arg(p.github_branch.as_deref().unwrap_or(DEFAULT_GITHUB_BRANCH));

    if p.skip_git {
        cmd = cmd.arg("--skip-git");
    }
    let optional = [
        ("--base-path", &p.base_path),
        ("--collections-file", &p.collections_file),
        ("--inventory-file", &p.inventory_file),
    ];
    for (flag, value) in optional {
        if let Some(value) = value {
            cmd = cmd.arg(flag).arg(value);
        }
    }
    cmd
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
