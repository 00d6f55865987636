//! Tests for the provider trait and metrics.

use async_trait::async_trait;
use ministudio_core::{CompiledRequest, CompiledRequestBuilder};
use ministudio_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ministudio_interface::{ProviderMetrics, ProviderOutput, ProviderStatus, VideoProvider};
use std::sync::Arc;
use std::time::Duration;

struct SquareOnly {
    ratios: Vec<String>,
}

#[async_trait]
impl VideoProvider for SquareOnly {
    async fn generate(&self, request: &CompiledRequest) -> ProviderResult<ProviderOutput> {
        if request.prompt().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::InvalidRequest(
                "empty prompt".to_string(),
            )));
        }
        Ok(ProviderOutput::new(format!("square://{}", request.shot_index())).with_seed(1))
    }

    fn name(&self) -> &str {
        "square"
    }

    fn max_duration(&self) -> f64 {
        4.0
    }

    fn supported_aspect_ratios(&self) -> &[String] {
        &self.ratios
    }
}

fn request(prompt: &str) -> CompiledRequest {
    CompiledRequestBuilder::default()
        .shot_index(3usize)
        .prompt(prompt)
        .negative_prompt("")
        .duration(4.0)
        .aspect_ratio("1:1")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_provider_as_trait_object() {
    let provider: Arc<dyn VideoProvider> = Arc::new(SquareOnly {
        ratios: vec!["1:1".to_string()],
    });

    assert!(provider.supports_aspect_ratio("1:1"));
    assert!(!provider.supports_aspect_ratio("16:9"));
    assert!(provider.timeout().is_none());

    let output = provider.generate(&request("orb")).await.unwrap();
    assert_eq!(output.output_ref(), "square://3");
    assert_eq!(*output.seed(), Some(1));

    let err = provider.generate(&request("")).await.unwrap_err();
    assert!(!ministudio_error::RetryableError::is_retryable(&err));
}

#[test]
fn test_metrics_status_transitions() {
    let mut metrics = ProviderMetrics::default();
    assert_eq!(metrics.status(false), ProviderStatus::Unhealthy);

    for _ in 0..ProviderMetrics::UNHEALTHY_AFTER {
        metrics.record_failure("network");
    }
    assert_eq!(metrics.status(true), ProviderStatus::Unhealthy);
    assert_eq!(metrics.last_error().as_deref(), Some("network"));

    metrics.record_success(Duration::from_millis(100));
    metrics.record_success(Duration::from_millis(300));
    assert_eq!(*metrics.consecutive_failures(), 0);
    // 2 of 5 succeeded
    assert_eq!(metrics.status(true), ProviderStatus::Degraded);
    assert_eq!(metrics.average_latency(), Some(Duration::from_millis(200)));

    metrics.record_success(Duration::from_millis(200));
    metrics.record_success(Duration::from_millis(200));
    assert_eq!(metrics.status(true), ProviderStatus::Healthy);
}
