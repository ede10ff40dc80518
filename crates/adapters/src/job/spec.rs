// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job spec construction for migration workloads.

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec, SecretKeySelector,
    SecretVolumeSource, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use x2a_core::callback::env as wl_env;
use x2a_core::{JobName, MigrationPhase};

pub const CONTAINER_NAME: &str = "x2a";
pub const CONFIG_VOLUME: &str = "config";
pub const CONFIG_MOUNT_PATH: &str = "/app/config";

pub const APP_LABEL: &str = "app";
pub const APP_LABEL_VALUE: &str = "x2a";
pub const PHASE_LABEL: &str = "x2a.dev/phase";
pub const JOB_NAME_LABEL: &str = "x2a.dev/job-name";

/// A credential the workload reads from its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretEnv {
    /// Environment variable inside the container
    pub env: &'static str,
    /// Key in the credential Secret
    pub key: &'static str,
    /// Missing key leaves the variable unset instead of failing the pod
    pub optional: bool,
}

const fn secret(env: &'static str, key: &'static str, optional: bool) -> SecretEnv {
    SecretEnv { env, key, optional }
}

/// Credentials wired into every workload.
pub const SECRET_ENV: &[SecretEnv] = &[
    secret("LLM_MODEL", "llm-model", false),
    secret("OPENAI_API_BASE", "openai-api-base", true),
    secret("OPENAI_API_KEY", "openai-api-key", true),
    secret("AWS_ACCESS_KEY_ID", "aws-access-key-id", true),
    secret("AWS_SECRET_ACCESS_KEY", "aws-secret-access-key", true),
    secret("AWS_REGION", "aws-region", true),
    secret("ORG_NAME", "org-name", true),
    secret("GITHUB_TOKEN", "github-token", true),
    secret("AAP_CONTROLLER_URL", "aap-controller-url", true),
    secret("AAP_ORG_NAME", "aap-org-name", true),
    secret("AAP_OAUTH_TOKEN", "aap-oauth-token", true),
];

/// Default key, within the credential Secret, of the shared callback secret.
pub const CALLBACK_SECRET_KEY: &str = "callback-secret";

/// One key of a Kubernetes Secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyRef {
    pub secret_name: String,
    pub key: String,
}

/// Where a finished workload reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackTarget {
    pub url: String,
    /// Resolved by the kubelet; the value itself never appears in the Job
    pub secret: Option<SecretKeyRef>,
}

/// How credential values reach the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `secretKeyRef`s into the named Secret, resolved by the kubelet at start
    SecretRefs { secret_name: String },
    /// Literal values captured at startup, by env var name
    Inline(Vec<(String, String)>),
}

/// Parameters for building a migration Job.
#[derive(Debug, Clone)]
pub struct JobParams {
    pub job_name: JobName,
    pub phase: MigrationPhase,
    pub namespace: String,
    pub image: String,
    /// Full container command, argv form
    pub command: Vec<String>,
    pub module_name: Option<String>,
    pub callback: Option<CallbackTarget>,
    pub credentials: Credentials,
    /// Secret mounted read-only at [`CONFIG_MOUNT_PATH`]
    pub config_secret: String,
}

/// Build a single-attempt `batch/v1` Job.
pub fn build_job(params: &JobParams) -> Job {
    let name = params.job_name.as_str();

    let mut env = vec![
        env_var(wl_env::JOB_NAME, name),
        env_var(wl_env::MIGRATION_PHASE, params.phase.as_str()),
    ];
    if let Some(ref module) = params.module_name {
        env.push(env_var(wl_env::MODULE_NAME, module));
    }
    if let Some(ref callback) = params.callback {
        env.push(env_var(wl_env::CALLBACK_URL, &callback.url));
        if let Some(ref secret) = callback.secret {
            let SecretKeyRef { ref secret_name, ref key } = *secret;
            env.push(secret_ref_var(wl_env::CALLBACK_SECRET, secret_name, key, false));
        }
    }
    match params.credentials {
        Credentials::SecretRefs { ref secret_name } => {
            env.extend(
                SECRET_ENV.iter().map(|s| secret_ref_var(s.env, secret_name, s.key, s.optional)),
            );
        }
        Credentials::Inline(ref values) => {
            env.extend(values.iter().map(|(k, v)| env_var(k, v)));
        }
    }

    let container = Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(params.image.clone()),
        command: Some(params.command.clone()),
        env: Some(env),
        volume_mounts: Some(vec![VolumeMount {
            name: CONFIG_VOLUME.to_string(),
            mount_path: CONFIG_MOUNT_PATH.to_string(),
            read_only: Some(true),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let labels: BTreeMap<String, String> = [
        (APP_LABEL.to_string(), APP_LABEL_VALUE.to_string()),
        (PHASE_LABEL.to_string(), params.phase.to_string()),
        (JOB_NAME_LABEL.to_string(), name.to_string()),
    ]
    .into_iter()
    .collect();

    Job {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(params.namespace.clone()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            // Failures are terminal; callers resubmit
            backoff_limit: Some(0),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta { labels: Some(labels), ..Default::default() }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![Volume {
                        name: CONFIG_VOLUME.to_string(),
                        secret: Some(SecretVolumeSource {
                            secret_name: Some(params.config_secret.clone()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }]),
                    restart_policy: Some("Never".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The container command of a built Job.
pub fn container_command(job: &Job) -> Option<&[String]> {
    job.spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .first()?
        .command
        .as_deref()
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar { name: name.to_string(), value: Some(value.to_string()), ..Default::default() }
}

fn secret_ref_var(name: &str, secret_name: &str, key: &str, optional: bool) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.to_string(),
                key: key.to_string(),
                optional: Some(optional),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
