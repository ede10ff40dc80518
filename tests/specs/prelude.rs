//! Shared harness for specs.

pub use axum::body::Body;
pub use axum::http::{Request, StatusCode};
pub use serde_json::{json, Value};
pub use x2a_adapters::{container_command, FakeSubmitter};
pub use x2a_core::{to_base36, Clock, FakeClock, CALLBACK_SECRET_HEADER};
pub use x2a_daemon::{Config, DeploymentProfile};

use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

pub const CALLBACK_URL: &str = "http://x2ad.x2a.svc:7007/api/collectArtifacts";

/// A daemon wired to a fake substrate, with its state in a temp dir.
pub struct Daemon {
    pub router: Router,
    pub submitter: FakeSubmitter,
    pub clock: FakeClock,
    pub config: Config,
    dir: TempDir,
}

impl Daemon {
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    pub fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_state_dir(dir.path().join("state"));
        config.callback_url = Some(CALLBACK_URL.to_string());
        configure(&mut config);
        Self::boot(config, dir)
    }

    /// Same state dir and config, fresh process state.
    pub fn restart(self) -> Self {
        Self::boot(self.config, self.dir)
    }

    fn boot(config: Config, dir: TempDir) -> Self {
        let submitter = FakeSubmitter::new();
        let clock = FakeClock::new();
        let state = x2a_daemon::app_state(&config, submitter.clone(), clock.clone()).unwrap();
        Self { router: x2a_daemon::router(state), submitter, clock, config, dir }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_with_secret(uri, body, None).await
    }

    pub async fn post_with_secret(
        &self,
        uri: &str,
        body: &Value,
        secret: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(CALLBACK_SECRET_HEADER, secret);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// `POST /api/jobs`, returning the issued job name.
    pub async fn create_job(&self, request: Value) -> String {
        let (status, body) = self.post("/api/jobs", &request).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["jobName"].as_str().unwrap().to_string()
    }
}

/// `x2a-{phase}-{slug}-{base36}` with a lowercase alphanumeric tail.
pub fn assert_identity(name: &str, phase: &str, slug: &str) {
    let prefix = format!("x2a-{phase}-{slug}-");
    assert!(name.starts_with(&prefix), "{name} should start with {prefix}");
    let tail = &name[prefix.len()..];
    assert!(!tail.is_empty() && tail.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    assert!(name.len() <= 63, "{name} is {} chars", name.len());
}
