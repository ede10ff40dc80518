// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures for listener tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use x2a_adapters::FakeSubmitter;
use x2a_core::FakeClock;

use crate::lifecycle::{app_state, Config};

pub const SECRET: &str = "s3cret";

/// A router over a fake substrate and a ledger in a temp dir.
pub struct TestApp {
    pub router: Router,
    pub submitter: FakeSubmitter,
    pub clock: FakeClock,
    pub _dir: TempDir,
}

impl TestApp {
    pub fn new(callback_secret: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_state_dir(dir.path());
        config.callback_url = Some("http://x2ad:7007/api/collectArtifacts".to_string());
        config.callback_secret = callback_secret.map(str::to_string);

        let submitter = FakeSubmitter::new();
        let clock = FakeClock::new();
        let state = app_state(&config, submitter.clone(), clock.clone()).unwrap();
        Self { router: super::router(state), submitter, clock, _dir: dir }
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

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(json_request(uri, body, None)).await
    }
}

pub fn json_request(uri: &str, body: &Value, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(x2a_core::CALLBACK_SECRET_HEADER, secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
