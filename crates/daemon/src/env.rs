// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.
//!
//! Only [`crate::lifecycle::Config::load`] calls into this module; everything
//! downstream receives explicit values.

use std::net::SocketAddr;
use std::path::PathBuf;

use x2a_adapters::job::{CALLBACK_SECRET_KEY, SECRET_ENV};

use crate::lifecycle::{DeploymentProfile, LifecycleError};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:7007";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_JOB_IMAGE: &str = "quay.io/x2ansible/x2a-convertor:latest";
pub const DEFAULT_SECRET_NAME: &str = "x2a-secrets";
pub const DEFAULT_CONFIG_SECRET: &str = "x2a-config";

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Resolve state directory: X2A_STATE_DIR > XDG_STATE_HOME/x2a > ~/.local/state/x2a
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = var("X2A_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("x2a"));
    }
    let home = var("HOME").ok_or(LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/x2a"))
}

/// HTTP bind address
pub fn listen_addr() -> Result<SocketAddr, LifecycleError> {
    let raw = var("X2A_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
    raw.parse().map_err(|e| LifecycleError::InvalidConfig {
        var: "X2A_LISTEN_ADDR",
        message: format!("{raw:?}: {e}"),
    })
}

/// Namespace jobs are created in
pub fn k8s_namespace() -> String {
    var("X2A_K8S_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

/// Container image for migration workloads
pub fn job_image() -> String {
    var("X2A_JOB_IMAGE").unwrap_or_else(|| DEFAULT_JOB_IMAGE.to_string())
}

pub fn profile() -> Result<DeploymentProfile, LifecycleError> {
    match var("X2A_PROFILE") {
        None => Ok(DeploymentProfile::default()),
        Some(raw) => raw
            .parse()
            .map_err(|message| LifecycleError::InvalidConfig { var: "X2A_PROFILE", message }),
    }
}

/// Where workloads post their completion report
pub fn callback_url() -> Option<String> {
    var("X2A_CALLBACK_URL")
}

/// Shared secret for completion callbacks. When set, callbacks without it are refused.
pub fn callback_secret() -> Option<String> {
    var("X2A_CALLBACK_SECRET")
}

/// Key, within [`secret_name`], holding the same value as `X2A_CALLBACK_SECRET`
pub fn callback_secret_key() -> String {
    var("X2A_CALLBACK_SECRET_KEY").unwrap_or_else(|| CALLBACK_SECRET_KEY.to_string())
}

/// Secret holding the workload credentials
pub fn secret_name() -> String {
    var("X2A_SECRET_NAME").unwrap_or_else(|| DEFAULT_SECRET_NAME.to_string())
}

/// Secret mounted as the workload's config volume
pub fn config_secret() -> String {
    var("X2A_CONFIG_SECRET").unwrap_or_else(|| DEFAULT_CONFIG_SECRET.to_string())
}

pub fn disambiguate_names() -> bool {
    var("X2A_DISAMBIGUATE_NAMES")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Workload credentials present in the daemon's own environment.
pub fn inline_credentials() -> Vec<(String, String)> {
    SECRET_ENV
        .iter()
        .filter_map(|s| var(s.env).map(|value| (s.env.to_string(), value)))
        .collect()
}
