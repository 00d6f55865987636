//! Provider that replays a fixed script of outcomes.

use crate::COMMON_ASPECT_RATIOS;
use async_trait::async_trait;
use ministudio_core::CompiledRequest;
use ministudio_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ministudio_interface::{ProviderOutput, VideoProvider};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// A single scripted outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedResponse {
    /// Return an output immediately
    Succeed,
    /// Return the given failure
    Fail(ProviderErrorKind),
    /// Sleep for the given time, then return an output
    Stall(Duration),
}

/// Provider that plays back queued outcomes, then repeats a fallback.
///
/// Every request is recorded so callers can assert on exactly what the
/// gateway sent and how many times.
///
/// # Examples
///
/// ```
/// use ministudio_error::ProviderErrorKind;
/// use ministudio_providers::{ScriptedProvider, ScriptedResponse};
///
/// let provider = ScriptedProvider::new("flaky")
///     .then(ScriptedResponse::Fail(ProviderErrorKind::RateLimited("429".into())))
///     .then(ScriptedResponse::Succeed);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug)]
pub struct ScriptedProvider {
    name: String,
    max_duration: f64,
    aspect_ratios: Vec<String>,
    timeout: Option<Duration>,
    script: Mutex<VecDeque<ScriptedResponse>>,
    fallback: ScriptedResponse,
    failing_shots: HashMap<usize, ProviderErrorKind>,
    requests: Mutex<Vec<CompiledRequest>>,
}

impl ScriptedProvider {
    /// Create a provider that always succeeds until scripted otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_duration: 10.0,
            aspect_ratios: COMMON_ASPECT_RATIOS.iter().map(|r| r.to_string()).collect(),
            timeout: None,
            script: Mutex::new(VecDeque::new()),
            fallback: ScriptedResponse::Succeed,
            failing_shots: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue the next outcome.
    pub fn then(self, response: ScriptedResponse) -> Self {
        lock(&self.script).push_back(response);
        self
    }

    /// Outcome used once the queue is empty.
    pub fn always(mut self, response: ScriptedResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Fail every call for one shot index, regardless of the queue.
    pub fn fail_shot(mut self, shot_index: usize, kind: ProviderErrorKind) -> Self {
        self.failing_shots.insert(shot_index, kind);
        self
    }

    /// Builder method to set the longest clip in seconds.
    pub fn with_max_duration(mut self, seconds: f64) -> Self {
        self.max_duration = seconds;
        self
    }

    /// Builder method to set the accepted aspect ratios.
    pub fn with_aspect_ratios<I, S>(mut self, ratios: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspect_ratios = ratios.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to declare a per-call time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<CompiledRequest> {
        lock(&self.requests).clone()
    }

    /// Shot indices of every request received, in order.
    pub fn shots_seen(&self) -> Vec<usize> {
        lock(&self.requests).iter().map(|r| *r.shot_index()).collect()
    }

    fn next_response(&self, request: &CompiledRequest) -> (usize, ScriptedResponse) {
        let call = {
            let mut requests = lock(&self.requests);
            requests.push(request.clone());
            requests.len()
        };

        if let Some(kind) = self.failing_shots.get(request.shot_index()) {
            return (call, ScriptedResponse::Fail(kind.clone()));
        }
        let response = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        (call, response)
    }

    fn output(&self, request: &CompiledRequest, call: usize) -> ProviderOutput {
        let output_ref = format!("{}://shot-{}/call-{}", self.name, request.shot_index(), call);
        ProviderOutput::new(output_ref.clone())
            .with_trailing_frame(format!("{}#last-frame", output_ref))
            .with_seed(request.seed().unwrap_or(call as u64))
    }
}

#[async_trait]
impl VideoProvider for ScriptedProvider {
    async fn generate(&self, request: &CompiledRequest) -> ProviderResult<ProviderOutput> {
        let (call, response) = self.next_response(request);
        debug!(provider = %self.name, call, ?response, "Scripted response");

        match response {
            ScriptedResponse::Succeed => Ok(self.output(request, call)),
            ScriptedResponse::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(self.output(request, call))
            }
            ScriptedResponse::Fail(kind) => Err(ProviderError::new(kind)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn max_duration(&self) -> f64 {
        self.max_duration
    }

    fn supported_aspect_ratios(&self) -> &[String] {
        &self.aspect_ratios
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Recorded requests stay readable after a panicking test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
