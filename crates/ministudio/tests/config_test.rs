//! Tests for layered configuration loading.

use ministudio::{
    CompilerConfig, FailurePolicy, RetryConfig, SequenceConfig, StudioConfig, StudioErrorKind,
};
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let config = StudioConfig::load().unwrap();

    assert_eq!(config.retry, RetryConfig::default());
    assert_eq!(config.sequence, SequenceConfig::default());
    assert_eq!(config.compiler, CompilerConfig::default());
    assert_eq!(config.gateway.default_timeout(), None);
}

#[test]
fn test_from_file_overrides_sections() {
    let file = write_config(
        r#"
[retry]
max_attempts = 5
initial_backoff_ms = 10
jitter = true

[sequence]
failure_policy = "continue"
lock_seed = true
seed = 42

[compiler]
style = "ghibli watercolor"

[gateway]
default_timeout_secs = 90

[providers.veo]
priority = -1
timeout_secs = 180
requests_per_minute = 10

[providers.mock]
enabled = false
"#,
    );

    let config = StudioConfig::from_file(file.path()).unwrap();

    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.initial_backoff_ms, 10);
    assert!(config.retry.jitter);
    assert_eq!(config.retry.backoff_factor, 2.0);

    assert_eq!(config.sequence.failure_policy, FailurePolicy::Continue);
    assert!(config.sequence.lock_seed);
    assert_eq!(config.sequence.seed, Some(42));

    assert_eq!(config.compiler.style.as_deref(), Some("ghibli watercolor"));
    assert_eq!(config.compiler.default_aspect_ratio, "16:9");

    assert_eq!(
        config.gateway.default_timeout(),
        Some(Duration::from_secs(90))
    );

    let veo = config.provider("veo").unwrap();
    assert_eq!(veo.priority, Some(-1));
    assert_eq!(veo.timeout_secs, Some(180));
    assert_eq!(veo.requests_per_minute, Some(10));
    assert_eq!(veo.enabled, None);
    assert_eq!(config.provider("mock").unwrap().enabled, Some(false));
    assert!(config.provider("kling").is_none());
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    let config = StudioConfig::from_file(file.path()).unwrap();
    assert_eq!(config, StudioConfig::default());
}

#[test]
fn test_zero_attempts_rejected() {
    let file = write_config("[retry]\nmax_attempts = 0\n");
    let err = StudioConfig::from_file(file.path()).unwrap_err();

    match err.kind() {
        StudioErrorKind::Config(e) => assert!(e.message.contains("max_attempts")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_shrinking_backoff_rejected() {
    let file = write_config("[retry]\nbackoff_factor = 0.5\n");
    assert!(StudioConfig::from_file(file.path()).is_err());
}

#[test]
fn test_zero_provider_timeout_rejected() {
    let file = write_config("[providers.veo]\ntimeout_secs = 0\n");
    let err = StudioConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("providers.veo.timeout_secs"));
}

#[test]
fn test_unknown_failure_policy_rejected() {
    let file = write_config("[sequence]\nfailure_policy = \"retry-forever\"\n");
    let err = StudioConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse configuration"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = StudioConfig::from_file(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read configuration"));
}
