//! Scripted generation backend for testing.

use async_trait::async_trait;
use bulle_core::{GenerateRequest, GenerateResponse};
use bulle_error::{BulleError, BulleResult, GenerationError, GenerationErrorKind};
use bulle_interface::BulleDriver;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A single scripted answer.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(GenerationErrorKind),
    /// Answer with the text after the delay
    Delayed(Duration, String),
    /// Panic inside generate()
    Panic,
}

/// Backend answering by prompt content.
///
/// Rules are checked in order: the first whose needle occurs in the prompt
/// answers. Prompts matching no rule get `EmptyResponse`.
pub struct MockDriver {
    rules: Vec<(String, MockResponse)>,
    prompts: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
}

impl MockDriver {
    /// Backend with no rules.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            prompts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency: Duration::from_millis(1),
        }
    }

    /// Backend that always answers `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new().on("", MockResponse::Success(text.into()))
    }

    /// Backend that always fails with `error`.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self::new().on("", MockResponse::Error(error))
    }

    /// Answer prompts containing `needle` with `response`.
    pub fn on(mut self, needle: impl Into<String>, response: MockResponse) -> Self {
        self.rules.push((needle.into(), response));
        self
    }

    /// Delay added to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of generate() calls.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Highest number of calls seen in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn pick(&self, prompt: &str) -> MockResponse {
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(MockResponse::Error(GenerationErrorKind::EmptyResponse))
    }
}

#[async_trait]
impl BulleDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> BulleResult<GenerateResponse> {
        self.prompts.lock().unwrap().push(req.prompt().clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;
        let result = match self.pick(req.prompt()) {
            MockResponse::Success(text) => Ok(GenerateResponse::new(text)),
            MockResponse::Error(kind) => Err(BulleError::from(GenerationError::new(kind))),
            MockResponse::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(GenerateResponse::new(text))
            }
            MockResponse::Panic => panic!("scripted backend panic"),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
