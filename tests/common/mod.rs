// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use summaly_server::{config::Config, routes, state::AppState};

/// Build the full application router with the given config.
pub fn create_test_app(config: Config) -> Router {
    let state = AppState::new(config).expect("Failed to build test state");
    routes::router(state)
}

/// Build the router with default settings.
pub fn default_app() -> Router {
    create_test_app(Config::default())
}

/// `/?url=...` with the target percent-encoded.
pub fn summary_uri(target: &str) -> String {
    format!("/?url={}", urlencoding::encode(target))
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri).await
}

pub async fn send(app: Router, method: Method, uri: &str) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Assert the default fixed headers are present.
pub fn assert_fixed_headers(response: &TestResponse) {
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("*"),
        "missing CORS header on {}",
        response.status
    );
    let csp = response
        .header("content-security-policy")
        .unwrap_or_else(|| panic!("missing CSP header on {}", response.status));
    assert!(csp.starts_with("default-src 'none'"), "unexpected CSP: {csp}");
}
