#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! This module provides test infrastructure that uses the REAL kernel code:
//! the same router and service as the `campus` binary, backed by the
//! in-memory menu store so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use campus_kernel::AppState;
use campus_kernel::models::MenuNode;
use campus_kernel::store::MemoryMenuStore;
use campus_test_utils::TestMenuNode;

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with an empty menu.
    pub fn new() -> Self {
        Self::with_store(MemoryMenuStore::new())
    }

    /// Create a test application seeded with fixture nodes, stored as given.
    pub fn seeded(fixtures: &[TestMenuNode]) -> Self {
        let nodes = fixtures.iter().map(to_model).collect();
        Self::with_store(MemoryMenuStore::with_nodes(nodes))
    }

    fn with_store(store: MemoryMenuStore) -> Self {
        let state = AppState::with_store(Arc::new(store));

        // Build the REAL router with all kernel routes (must match main.rs)
        let router = campus_kernel::routes::router()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send a request with an optional JSON body, returning status and parsed body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.request(request).await;
        let status = response.status();
        (status, json_body(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

/// Convert a fixture into the kernel model.
pub fn to_model(fixture: &TestMenuNode) -> MenuNode {
    serde_json::from_value(fixture.to_json()).expect("fixture should deserialize")
}

/// Read a response body as JSON.
///
/// Empty bodies become `Value::Null`; non-JSON bodies (e.g. extractor
/// rejections) are returned as a string.
pub async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
