//! Shared helpers for HTTP integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bulle_core::{BulleConfig, GenerateRequest, GenerateResponse};
use bulle_error::{BulleResult, GenerationError, GenerationErrorKind};
use bulle_interface::BulleDriver;
use bulle_server::{AppState, create_router};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

/// Backend answering every prompt the same way.
pub struct ScriptedDriver {
    answer: Result<String, GenerationErrorKind>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn error(kind: GenerationErrorKind) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(kind),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BulleDriver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> BulleResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(text) => Ok(GenerateResponse::new(text.clone())),
            Err(kind) => Err(GenerationError::new(kind.clone()).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Application router generating with `driver`.
pub fn build_test_app(driver: Arc<ScriptedDriver>) -> Router {
    create_router(AppState::new(driver, &BulleConfig::default()))
}

/// Application router without a generation backend.
pub fn build_offline_app() -> Router {
    create_router(AppState::without_backend(&BulleConfig::default()))
}

/// Send a JSON POST request.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
