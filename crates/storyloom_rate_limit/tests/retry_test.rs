//! Tests for the bounded retry executor.

use std::sync::atomic::{AtomicU32, Ordering};
use storyloom_error::{
    ConfigError, ExtractionError, ExtractionErrorKind, ServiceError, ServiceErrorKind,
    StoryloomError, StoryloomErrorKind,
};
use storyloom_rate_limit::{RetryPolicy, execute_with_retry};

fn fast(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff_ms: 1,
        max_delay_secs: 1,
    }
}

#[tokio::test]
async fn test_succeeds_after_transient_failures() {
    let calls = AtomicU32::new(0);

    let result: Result<&str, StoryloomError> = execute_with_retry(&fast(3), "flaky", || async {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n < 3 {
            Err(ServiceError::new(ServiceErrorKind::Status {
                status: 503,
                message: "busy".to_string(),
            })
            .into())
        } else {
            Ok("done")
        }
    })
    .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_stops_after_max_attempts() {
    let calls = AtomicU32::new(0);

    let result: Result<(), StoryloomError> = execute_with_retry(&fast(2), "malformed", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ExtractionError::new(ExtractionErrorKind::NoChapters).into())
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err.kind(), StoryloomErrorKind::Extraction(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_permanent_error_is_not_retried() {
    let calls = AtomicU32::new(0);

    let result: Result<(), StoryloomError> = execute_with_retry(&fast(5), "config", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ConfigError::new("bad").into())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let calls = AtomicU32::new(0);

    let result: Result<(), StoryloomError> = execute_with_retry(&fast(5), "auth", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::new(ServiceErrorKind::Status {
            status: 401,
            message: "no key".to_string(),
        })
        .into())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_single_attempt_policy() {
    let calls = AtomicU32::new(0);

    let result: Result<(), StoryloomError> =
        execute_with_retry(&RetryPolicy::none(), "once", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::new(ServiceErrorKind::EmptyResponse).into())
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
