use hwc_core::error::{RetryError, RetryPolicyError};
use hwc_core::retry::{BackoffStrategy, RetryEngine, RetryPolicy, Retryable};
use hwc_core::{CloudError, ErrorKind};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        strategy: BackoffStrategy::Fixed,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(10),
        multiplier: 1.0,
        jitter: 0.0,
    }
}

/// **VALUE**: Verifies a single-attempt policy runs once and returns the raw error.
///
/// **WHY THIS MATTERS**: "Retry disabled" must not print "gave up after 1 attempts".
///
/// **BUG THIS CATCHES**: Would catch the exhausted wrapper being applied to a
/// single-attempt policy.
#[tokio::test]
async fn given_single_attempt_policy_when_operation_fails_then_raw_error_returned() {
    // GIVEN: A single-attempt engine and a retryable failure
    let engine = RetryEngine::new(RetryPolicy::single_attempt()).unwrap();
    let calls = AtomicU32::new(0);

    // WHEN: Executing
    let result: Result<(), _> = engine
        .execute(&CancellationToken::new(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CloudError::server("boom"))
        })
        .await;

    // THEN: One call, unwrapped error
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    match result {
        Err(RetryError::Failed(error)) => assert_eq!(error.message(), "boom"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

/// **VALUE**: Verifies a retryable failure runs exactly `max_attempts` times and ends in
/// an exhausted error that unwraps to the last cause.
///
/// **BUG THIS CATCHES**: Would catch off-by-one attempt counts and a lost cause chain.
#[tokio::test]
async fn given_always_failing_operation_when_executed_then_exactly_n_attempts_and_exhausted() {
    // GIVEN: Four attempts and an operation that always throttles
    let engine = RetryEngine::new(fast_policy(4)).unwrap();
    let calls = AtomicU32::new(0);

    // WHEN: Executing
    let result: Result<(), _> = engine
        .execute(&CancellationToken::new(), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(CloudError::new(ErrorKind::Throttle, "Throttled", format!("call {n}")))
        })
        .await;

    // THEN: Four calls, exhausted, cause is the last error
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    let error = result.unwrap_err();
    assert!(error.is_exhausted());
    assert!(error.to_string().contains("after 4 attempts"));
    assert_eq!(error.inner().unwrap().message(), "call 4");
    let source = std::error::Error::source(&error).unwrap();
    assert!(source.to_string().contains("call 4"));
}

/// **VALUE**: Verifies a non-retryable error stops the loop immediately.
///
/// **BUG THIS CATCHES**: Would catch auth failures being retried.
#[tokio::test]
async fn given_non_retryable_error_when_executed_then_stops_after_one_call() {
    // GIVEN: A generous budget and an auth failure
    let engine = RetryEngine::new(fast_policy(5)).unwrap();
    let calls = AtomicU32::new(0);

    // WHEN: Executing
    let result: Result<(), _> = engine
        .execute(&CancellationToken::new(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CloudError::auth("bad key").with_request_id("req-1"))
        })
        .await;

    // THEN: One call, verbatim error including the request id
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let error = result.unwrap_err();
    assert!(matches!(error, RetryError::Failed(_)));
    assert!(error.to_string().contains("(RequestID: req-1)"));
}

#[tokio::test]
async fn given_transient_failures_when_executed_then_eventual_success_returned() {
    let engine = RetryEngine::new(fast_policy(3)).unwrap();
    let calls = AtomicU32::new(0);

    let result = engine
        .execute(&CancellationToken::new(), || async {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(CloudError::network("reset")),
                _ => Ok("done"),
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

/// **VALUE**: Verifies waits respect `max_delay * (1 + jitter)`.
///
/// **BUG THIS CATCHES**: Would catch the delay being applied before clamping or the
/// schedule using attempt+1.
#[tokio::test]
async fn given_clamped_policy_when_executed_then_total_wait_bounded() {
    // GIVEN: Exponential growth clamped to 20ms with 50% jitter, 4 attempts
    let engine = RetryEngine::new(RetryPolicy {
        max_attempts: 4,
        strategy: BackoffStrategy::Exponential,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(20),
        multiplier: 10.0,
        jitter: 0.5,
    })
    .unwrap();

    // WHEN: Executing an always-failing operation
    let started = Instant::now();
    let _: Result<(), _> = engine
        .execute(&CancellationToken::new(), || async {
            Err(CloudError::server("down"))
        })
        .await;
    let elapsed = started.elapsed();

    // THEN: At least 10 + 20 + 20 ms, and well under an unclamped schedule (10 + 100 + 1000)
    assert!(elapsed >= Duration::from_millis(50), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1000), "elapsed {elapsed:?}");
}

/// **VALUE**: Verifies cancellation during a wait aborts before the next attempt.
///
/// **WHY THIS MATTERS**: Ctrl-C during a 30 s backoff must not wait out the delay.
///
/// **BUG THIS CATCHES**: Would catch a plain `sleep` that ignores the token.
#[tokio::test]
async fn given_cancel_during_wait_when_executed_then_returns_cancelled_early() {
    // GIVEN: Long delays and a token cancelled shortly after the first failure
    let engine = RetryEngine::new(RetryPolicy {
        max_attempts: 5,
        strategy: BackoffStrategy::Fixed,
        base_delay: Duration::from_secs(30),
        max_delay: Duration::from_secs(30),
        multiplier: 1.0,
        jitter: 0.0,
    })
    .unwrap();
    let cancel = CancellationToken::new();
    let calls = Arc::new(AtomicU32::new(0));
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    // WHEN: Executing
    let started = Instant::now();
    let counter = Arc::clone(&calls);
    let result: Result<(), _> = engine
        .execute(&cancel, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CloudError::server("down"))
            }
        })
        .await;

    // THEN: Cancelled quickly, fewer calls than the budget
    let error = result.unwrap_err();
    assert!(error.is_cancelled());
    assert!(error.inner().is_none());
    assert!(calls.load(Ordering::SeqCst) < 5);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn given_cancelled_token_when_executed_then_no_attempt_made() {
    let engine = RetryEngine::new(fast_policy(3)).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = AtomicU32::new(0);

    let result: Result<(), RetryError<CloudError>> = engine
        .execute(&cancel, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

    match result {
        Err(RetryError::Cancelled { attempts, .. }) => assert_eq!(attempts, 0),
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn given_zero_attempt_policy_when_engine_built_then_rejected() {
    let result = RetryEngine::new(RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::default()
    });

    assert!(matches!(result, Err(RetryPolicyError::InvalidPolicy { .. })));
}

#[derive(Debug)]
struct Flaky {
    transient: bool,
}

impl fmt::Display for Flaky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flaky (transient={})", self.transient)
    }
}

impl Retryable for Flaky {
    fn is_retryable(&self) -> bool {
        self.transient
    }
}

/// **VALUE**: Verifies the engine is generic over the operation's value and error types.
///
/// **BUG THIS CATCHES**: Would catch the engine being tied to `CloudError`.
#[tokio::test]
async fn given_custom_error_type_when_executed_then_typed_value_returned() {
    // GIVEN: An operation returning a Vec on the second call
    let engine = RetryEngine::new(fast_policy(3)).unwrap();
    let calls = AtomicU32::new(0);

    // WHEN: Executing
    let result: Result<Vec<u8>, RetryError<Flaky>> = engine
        .execute(&CancellationToken::new(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Flaky { transient: true })
            } else {
                Ok(vec![1, 2, 3])
            }
        })
        .await;

    // THEN: Typed value, no casting
    assert_eq!(result.unwrap(), vec![1, 2, 3]);
}
