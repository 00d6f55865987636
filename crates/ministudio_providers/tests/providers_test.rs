//! Tests for the offline providers.

use ministudio_core::{CompiledRequest, CompiledRequestBuilder, ContinuityHint, ContinuityPayload};
use ministudio_error::{FailureClass, ProviderErrorKind};
use ministudio_interface::VideoProvider;
use ministudio_providers::{MockVideoProvider, ScriptedProvider, ScriptedResponse};
use std::time::Duration;

fn request(index: usize, prompt: &str, seed: Option<u64>) -> CompiledRequest {
    CompiledRequestBuilder::default()
        .shot_index(index)
        .prompt(prompt)
        .negative_prompt("blurry")
        .duration(4.0)
        .aspect_ratio("16:9")
        .seed(seed)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_mock_output_depends_on_request() {
    let provider = MockVideoProvider::new();

    let a = provider.generate(&request(0, "orb", None)).await.unwrap();
    let b = provider.generate(&request(0, "orb", None)).await.unwrap();
    let c = provider.generate(&request(0, "cat", None)).await.unwrap();

    assert_eq!(a, b);
    assert_ne!(a.output_ref(), c.output_ref());
    // 64 hex characters after the scheme
    assert_eq!(a.output_ref().len(), "mock://".len() + 64);
    assert!(a.trailing_frame().is_some());
}

#[tokio::test]
async fn test_mock_echoes_explicit_seed() {
    let provider = MockVideoProvider::new();
    let output = provider.generate(&request(0, "orb", Some(42))).await.unwrap();
    assert_eq!(*output.seed(), Some(42));
}

#[tokio::test]
async fn test_mock_output_changes_with_continuity() {
    let provider = MockVideoProvider::new().with_name("veo-mock").with_max_duration(8.0);
    let plain = request(1, "orb", None);
    let continued = CompiledRequestBuilder::default()
        .shot_index(1usize)
        .prompt("orb")
        .negative_prompt("blurry")
        .duration(4.0)
        .aspect_ratio("16:9")
        .continuity(ContinuityHint::Attached(ContinuityPayload::new(
            0,
            "veo-mock",
            "veo-mock://abc",
        )))
        .build()
        .unwrap();

    let a = provider.generate(&plain).await.unwrap();
    let b = provider.generate(&continued).await.unwrap();
    assert_ne!(a.output_ref(), b.output_ref());
    assert!(a.output_ref().starts_with("veo-mock://"));
    assert_eq!(provider.max_duration(), 8.0);
}

#[tokio::test]
async fn test_scripted_plays_queue_then_fallback() {
    let provider = ScriptedProvider::new("flaky")
        .then(ScriptedResponse::Fail(ProviderErrorKind::Unavailable("503".into())))
        .then(ScriptedResponse::Succeed)
        .always(ScriptedResponse::Fail(ProviderErrorKind::ContentRejected(
            "policy".into(),
        )));

    let req = request(0, "orb", None);
    let err = provider.generate(&req).await.unwrap_err();
    assert_eq!(err.class(), FailureClass::Transient);

    let output = provider.generate(&req).await.unwrap();
    assert_eq!(output.output_ref(), "flaky://shot-0/call-2");

    let err = provider.generate(&req).await.unwrap_err();
    assert_eq!(err.class(), FailureClass::Permanent);
    let err = provider.generate(&req).await.unwrap_err();
    assert_eq!(err.class(), FailureClass::Permanent);

    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn test_scripted_fail_shot_overrides_queue() {
    let provider = ScriptedProvider::new("picky")
        .fail_shot(1, ProviderErrorKind::InvalidRequest("bad shot".into()));

    assert!(provider.generate(&request(0, "a", None)).await.is_ok());
    assert!(provider.generate(&request(1, "b", None)).await.is_err());
    assert!(provider.generate(&request(2, "c", None)).await.is_ok());
    assert_eq!(provider.shots_seen(), vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_scripted_stall_waits() {
    let provider = ScriptedProvider::new("slow")
        .then(ScriptedResponse::Stall(Duration::from_secs(30)))
        .with_timeout(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    provider.generate(&request(0, "orb", None)).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(provider.timeout(), Some(Duration::from_secs(5)));
}
