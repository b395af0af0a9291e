//! Tests for the layered configuration system.

use std::io::Write;
use storyloom_error::StoryloomErrorKind;
use storyloom_rate_limit::{RetryPolicy, StoryloomConfig};
use tempfile::Builder;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(temp_file, "{}", contents).unwrap();
    temp_file
}

#[test]
fn test_bundled_defaults() {
    let config = StoryloomConfig::bundled().unwrap();

    assert_eq!(config.provider.name, "openrouter");
    assert_eq!(config.provider.model, "meta-llama/llama-3.1-8b-instruct:free");
    assert_eq!(config.provider.api_key_env, "OPENROUTER_API_KEY");
    assert_eq!(config.provider.timeout_secs, 300);
    assert_eq!(config.rate_limit.rpm, None);

    assert_eq!(
        config.retry.generation,
        RetryPolicy::none()
            .with_initial_backoff_ms(2000)
            .with_max_delay(60)
    );
    assert_eq!(
        config.retry.extraction,
        RetryPolicy::none()
            .with_initial_backoff_ms(500)
            .with_max_delay(10)
    );

    assert_eq!(*config.pipeline.max_concurrent_chapters(), 1);
    assert_eq!(*config.pipeline.preview_chars(), 100);
    assert_eq!(*config.pipeline.story_preview_chars(), 200);
}

#[test]
fn test_file_overrides_only_what_it_names() {
    let file = write_config(
        r#"
[provider]
model = "mistralai/mistral-7b-instruct"
temperature = 0.8

[rate_limit]
rpm = 20

[retry.extraction]
max_attempts = 3

[pipeline]
max_concurrent_chapters = 4
"#,
    );

    let config = StoryloomConfig::from_file(file.path()).unwrap();

    assert_eq!(config.provider.model, "mistralai/mistral-7b-instruct");
    assert_eq!(config.provider.temperature, Some(0.8));
    // Untouched keys keep bundled values
    assert_eq!(config.provider.name, "openrouter");
    assert_eq!(config.retry.extraction.initial_backoff_ms, 500);
    assert_eq!(config.retry.extraction.max_attempts, 3);
    assert_eq!(config.rate_limit.rpm, Some(20));
    assert_eq!(*config.pipeline.max_concurrent_chapters(), 4);
    assert_eq!(*config.pipeline.preview_chars(), 100);
}

#[test]
fn test_zero_attempts_rejected() {
    let file = write_config(
        r#"
[retry.generation]
max_attempts = 0
"#,
    );

    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), StoryloomErrorKind::Config(_)));
    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn test_zero_chapter_concurrency_rejected() {
    let file = write_config(
        r#"
[pipeline]
max_concurrent_chapters = 0
"#,
    );

    assert!(StoryloomConfig::from_file(file.path()).is_err());
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("[provider\nmodel = ");

    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), StoryloomErrorKind::Config(_)));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(StoryloomConfig::load_with(Some(&missing)).is_err());
}

#[test]
fn test_explicit_file_wins() {
    let file = write_config(
        r#"
[provider]
name = "openai"
base_url = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
"#,
    );

    let config = StoryloomConfig::load_with(Some(file.path())).unwrap();
    assert_eq!(config.provider.name, "openai");
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
}
