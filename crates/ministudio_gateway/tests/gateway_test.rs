//! Tests for provider ordering, retry, and fallback.

use ministudio_core::{CompiledRequest, CompiledRequestBuilder, ShotError};
use ministudio_error::{FailureClass, GatewayErrorKind, ProviderErrorKind};
use ministudio_gateway::{ProviderGateway, RetryConfig};
use ministudio_interface::{ProviderStatus, VideoProvider};
use ministudio_providers::{MockVideoProvider, ScriptedProvider, ScriptedResponse};
use std::sync::Arc;
use std::time::Duration;

fn request(duration: f64, aspect_ratio: &str) -> CompiledRequest {
    CompiledRequestBuilder::default()
        .shot_index(0usize)
        .prompt("A golden orb floats")
        .negative_prompt("blurry")
        .duration(duration)
        .aspect_ratio(aspect_ratio)
        .build()
        .unwrap()
}

fn rate_limited() -> ProviderErrorKind {
    ProviderErrorKind::RateLimited("429".to_string())
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_retried_in_place() {
    let primary = Arc::new(
        ScriptedProvider::new("primary")
            .then(ScriptedResponse::Fail(rate_limited()))
            .then(ScriptedResponse::Fail(rate_limited()))
            .then(ScriptedResponse::Succeed),
    );
    let backup = Arc::new(ScriptedProvider::new("backup"));

    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();
    gateway.register(backup.clone(), 1).unwrap();

    let started = tokio::time::Instant::now();
    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(result.is_success());
    assert_eq!(result.provider_name(), Some("primary"));
    assert_eq!(primary.call_count(), 3);
    assert_eq!(backup.call_count(), 0);
    // 1 s then 2 s of backoff
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_transient_falls_through() {
    let primary = Arc::new(
        ScriptedProvider::new("primary").always(ScriptedResponse::Fail(
            ProviderErrorKind::Unavailable("503".to_string()),
        )),
    );
    let backup = Arc::new(ScriptedProvider::new("backup"));

    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();
    gateway.register(backup.clone(), 1).unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(result.is_success());
    assert_eq!(result.provider_name(), Some("backup"));
    assert_eq!(primary.call_count(), 3);
    assert_eq!(backup.call_count(), 1);

    let failed = result.failed_attempts();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].provider(), "primary");
    assert_eq!(*failed[0].attempts(), 3);
    assert_eq!(*failed[0].class(), FailureClass::Transient);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_not_retried() {
    let primary = Arc::new(
        ScriptedProvider::new("primary").always(ScriptedResponse::Fail(
            ProviderErrorKind::ContentRejected("policy".to_string()),
        )),
    );
    let backup = Arc::new(ScriptedProvider::new("backup"));

    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();
    gateway.register(backup.clone(), 1).unwrap();

    let started = tokio::time::Instant::now();
    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(result.is_success());
    assert_eq!(primary.call_count(), 1);
    assert_eq!(backup.call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_all_providers_fail_aggregates_every_attempt() {
    let primary = Arc::new(ScriptedProvider::new("primary").always(ScriptedResponse::Fail(rate_limited())));
    let backup = Arc::new(
        ScriptedProvider::new("backup").always(ScriptedResponse::Fail(
            ProviderErrorKind::InvalidRequest("bad".to_string()),
        )),
    );

    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();
    gateway.register(backup.clone(), 1).unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(!result.is_success());
    assert!(result.output_ref().is_none());
    assert!(result.continuity().is_none());
    match result.error() {
        Some(ShotError::ExhaustedProviders(attempts)) => {
            let names: Vec<&str> = attempts.iter().map(|a| a.provider().as_str()).collect();
            assert_eq!(names, vec!["primary", "backup"]);
            assert_eq!(*attempts[0].attempts(), 3);
            assert_eq!(*attempts[1].attempts(), 1);
            assert_eq!(*attempts[1].class(), FailureClass::Permanent);
        }
        other => panic!("Expected exhausted providers, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_providers_fails_shot() {
    let gateway = ProviderGateway::new();
    let result = gateway.generate(&request(4.0, "16:9")).await;
    assert_eq!(result.error(), Some(&ShotError::ExhaustedProviders(Vec::new())));
}

#[test]
fn test_priority_then_registration_order() {
    let mut gateway = ProviderGateway::new();
    gateway.register(Arc::new(ScriptedProvider::new("c")), 5).unwrap();
    gateway.register(Arc::new(ScriptedProvider::new("a")), 1).unwrap();
    gateway.register(Arc::new(ScriptedProvider::new("b")), 1).unwrap();
    gateway.register(Arc::new(ScriptedProvider::new("first")), -1).unwrap();

    assert_eq!(gateway.provider_names(), vec!["first", "a", "b", "c"]);
}

#[tokio::test]
async fn test_duration_clamped_to_provider_maximum() {
    let veo = Arc::new(ScriptedProvider::new("veo").with_max_duration(8.0));
    let mut gateway = ProviderGateway::new();
    gateway.register(veo.clone(), 0).unwrap();

    let original = request(12.0, "16:9");
    let result = gateway.generate(&original).await;

    assert!(result.is_success());
    let seen = veo.requests();
    assert_eq!(*seen[0].duration(), 8.0);
    assert!(*seen[0].duration_clamped());
    // The caller's request is untouched
    assert_eq!(*original.duration(), 12.0);
}

#[tokio::test]
async fn test_unsupported_aspect_ratio_skips_provider() {
    let square = Arc::new(ScriptedProvider::new("square").with_aspect_ratios(["1:1"]));
    let wide = Arc::new(ScriptedProvider::new("wide"));

    let mut gateway = ProviderGateway::new();
    gateway.register(square.clone(), 0).unwrap();
    gateway.register(wide.clone(), 1).unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert_eq!(result.provider_name(), Some("wide"));
    assert_eq!(square.call_count(), 0);
    let failed = result.failed_attempts();
    assert_eq!(*failed[0].attempts(), 0);
    assert_eq!(*failed[0].class(), FailureClass::Permanent);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_transient() {
    let slow = Arc::new(
        ScriptedProvider::new("slow")
            .then(ScriptedResponse::Stall(Duration::from_secs(600)))
            .then(ScriptedResponse::Succeed),
    );

    let mut gateway = ProviderGateway::new().with_default_timeout(Some(Duration::from_secs(5)));
    gateway.register(slow.clone(), 0).unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(result.is_success());
    assert_eq!(slow.call_count(), 2);
    assert_eq!(result.output_ref(), Some("slow://shot-0/call-2"));
}

#[tokio::test(start_paused = true)]
async fn test_registration_timeout_overrides_provider_timeout() {
    let slow = Arc::new(
        ScriptedProvider::new("slow")
            .with_timeout(Duration::from_secs(120))
            .always(ScriptedResponse::Stall(Duration::from_secs(60))),
    );

    let mut gateway = ProviderGateway::new().with_retry(RetryConfig::no_retry());
    gateway.register(slow.clone(), 0).unwrap();
    gateway
        .set_timeout("slow", Some(Duration::from_secs(10)))
        .unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().to_string().contains("Timed out"));
}

#[tokio::test]
async fn test_disabled_provider_is_skipped() {
    let primary = Arc::new(ScriptedProvider::new("primary"));
    let backup = Arc::new(ScriptedProvider::new("backup"));

    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();
    gateway.register(backup.clone(), 1).unwrap();
    gateway.disable("primary").unwrap();

    let result = gateway.generate(&request(4.0, "16:9")).await;
    assert_eq!(result.provider_name(), Some("backup"));
    assert_eq!(primary.call_count(), 0);

    let info = gateway.provider("primary").unwrap();
    assert!(!*info.enabled());
    assert_eq!(*info.status(), ProviderStatus::Unhealthy);

    gateway.enable("primary").unwrap();
    let result = gateway.generate(&request(4.0, "16:9")).await;
    assert_eq!(result.provider_name(), Some("primary"));
}

#[tokio::test]
async fn test_metrics_recorded_per_call() {
    let primary = Arc::new(
        ScriptedProvider::new("primary")
            .then(ScriptedResponse::Fail(ProviderErrorKind::Other("boom".to_string()))),
    );
    let mut gateway = ProviderGateway::new();
    gateway.register(primary.clone(), 0).unwrap();

    gateway.generate(&request(4.0, "16:9")).await;
    gateway.generate(&request(4.0, "16:9")).await;

    let info = gateway.provider("primary").unwrap();
    assert_eq!(*info.metrics().total_requests(), 2);
    assert_eq!(*info.metrics().failed_requests(), 1);
    assert_eq!(*info.status(), ProviderStatus::Healthy);
}

#[test]
fn test_registration_errors() {
    let mut gateway = ProviderGateway::new();
    gateway.register(Arc::new(MockVideoProvider::new()), 0).unwrap();

    let err = gateway
        .register(Arc::new(MockVideoProvider::new()), 1)
        .unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::DuplicateProvider("mock".to_string()));

    let err = gateway
        .register(Arc::new(MockVideoProvider::new().with_name("zero").with_max_duration(0.0)), 1)
        .unwrap_err();
    assert!(matches!(err.kind, GatewayErrorKind::InvalidLimits { .. }));

    let err = gateway.disable("ghost").unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::UnknownProvider("ghost".to_string()));

    let removed = gateway.unregister("mock").unwrap();
    assert_eq!(removed.name(), "mock");
    assert!(gateway.is_empty());
}

#[test]
fn test_retry_delays_respect_cap() {
    let retry = RetryConfig {
        max_attempts: 5,
        initial_backoff_ms: 1000,
        backoff_factor: 4.0,
        max_delay_ms: 5000,
        jitter: false,
    };
    let delays: Vec<u64> = retry.delays().map(|d| d.as_millis() as u64).collect();
    assert_eq!(delays, vec![1000, 4000, 5000, 5000]);
    assert_eq!(RetryConfig::no_retry().delays().count(), 0);
}

async fn burst(gateway: &ProviderGateway, calls: usize) {
    for _ in 0..calls {
        assert!(gateway.generate(&request(4.0, "16:9")).await.is_success());
    }
}

// Governor runs on the wall clock, so these tests use real time.
#[tokio::test]
async fn test_requests_per_minute_holds_back_extra_calls() {
    let provider = Arc::new(ScriptedProvider::new("metered"));
    let mut gateway = ProviderGateway::new().with_retry(RetryConfig::no_retry());
    gateway.register(provider.clone(), 0).unwrap();
    // 120 per minute: a burst of 120, then one call every 500 ms
    gateway.set_requests_per_minute("metered", Some(120)).unwrap();

    let started = std::time::Instant::now();
    burst(&gateway, 120).await;
    assert!(started.elapsed() < Duration::from_millis(250));

    let extra = std::time::Instant::now();
    burst(&gateway, 1).await;
    assert!(extra.elapsed() >= Duration::from_millis(300));
    assert_eq!(provider.call_count(), 121);
}

#[tokio::test]
async fn test_clearing_requests_per_minute_removes_limit() {
    let mut gateway = ProviderGateway::new().with_retry(RetryConfig::no_retry());
    gateway
        .register(Arc::new(ScriptedProvider::new("metered")), 0)
        .unwrap();

    for cleared in [None, Some(0)] {
        gateway.set_requests_per_minute("metered", Some(120)).unwrap();
        burst(&gateway, 120).await;

        gateway.set_requests_per_minute("metered", cleared).unwrap();
        let started = std::time::Instant::now();
        burst(&gateway, 5).await;
        assert!(started.elapsed() < Duration::from_millis(250));
    }
}

#[test]
fn test_requests_per_minute_unknown_provider() {
    let mut gateway = ProviderGateway::new();
    let err = gateway
        .set_requests_per_minute("ghost", Some(10))
        .unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::UnknownProvider("ghost".to_string()));
}
