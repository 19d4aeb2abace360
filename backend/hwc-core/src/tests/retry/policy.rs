// Unit tests for RetryPolicy
// Focus: delay schedule, clamping, jitter bounds and validation

use crate::retry::{BackoffStrategy, RetryPolicy};

use std::time::Duration;

use backoff::backoff::Backoff;

fn policy(strategy: BackoffStrategy) -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        strategy,
        base_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(1000),
        multiplier: 2.0,
        jitter: 0.0,
    }
}

/// **VALUE**: Verifies the three strategies produce their documented schedules.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one exponent (first retry waiting
/// `base * multiplier` instead of `base`).
#[test]
fn given_each_strategy_when_delays_computed_then_schedule_matches() {
    // GIVEN: Policies differing only in strategy
    let fixed = policy(BackoffStrategy::Fixed);
    let linear = policy(BackoffStrategy::Linear);
    let exponential = policy(BackoffStrategy::Exponential);

    // THEN: Delays follow base, n * base, base * 2^(n-1)
    let ms = |d: Duration| d.as_millis();
    assert_eq!((1..=3).map(|n| ms(fixed.base_delay_for(n))).collect::<Vec<_>>(), [100, 100, 100]);
    assert_eq!((1..=3).map(|n| ms(linear.base_delay_for(n))).collect::<Vec<_>>(), [100, 200, 300]);
    assert_eq!(
        (1..=3).map(|n| ms(exponential.base_delay_for(n))).collect::<Vec<_>>(),
        [100, 200, 400]
    );
}

/// **VALUE**: Verifies delays are clamped to `max_delay`, even for huge attempt numbers.
///
/// **WHY THIS MATTERS**: `base * 2^200` overflows `Duration`; `Duration::from_secs_f64`
/// panics on overflow.
///
/// **BUG THIS CATCHES**: Would catch clamping after conversion instead of before.
#[test]
fn given_large_attempt_when_delay_computed_then_clamped_without_panic() {
    // GIVEN: An exponential policy
    let policy = policy(BackoffStrategy::Exponential);

    // THEN: Large attempts clamp to max_delay
    assert_eq!(policy.base_delay_for(5), Duration::from_millis(1000));
    assert_eq!(policy.base_delay_for(200), Duration::from_millis(1000));
    assert_eq!(policy.base_delay_for(u32::MAX), Duration::from_millis(1000));
}

/// **VALUE**: Verifies jitter only ever adds to the clamped delay, bounded by the fraction.
///
/// **BUG THIS CATCHES**: Would catch symmetric jitter (which can shorten waits) or jitter
/// applied before clamping.
#[test]
fn given_jitter_when_delays_sampled_then_within_clamped_bounds() {
    // GIVEN: A policy with 50% jitter, already at the clamp
    let policy = RetryPolicy {
        jitter: 0.5,
        ..policy(BackoffStrategy::Exponential)
    };

    for _ in 0..200 {
        // WHEN: Sampling the delay for a clamped attempt
        let delay = policy.delay_for(10);

        // THEN: max_delay <= delay <= max_delay * 1.5
        assert!(delay >= Duration::from_millis(1000));
        assert!(delay <= Duration::from_millis(1500));
    }
}

/// **VALUE**: Verifies the backoff schedule yields exactly `max_attempts - 1` delays.
///
/// **WHY THIS MATTERS**: The engine stops when the schedule is empty; one delay too many
/// means one attempt too many.
#[test]
fn given_policy_when_backoff_iterated_then_yields_attempts_minus_one_delays() {
    // GIVEN: A five-attempt policy
    let mut backoff = policy(BackoffStrategy::Fixed).backoff();

    // WHEN: Draining the schedule
    let mut delays = 0;
    while backoff.next_backoff().is_some() {
        delays += 1;
    }

    // THEN: Four delays, and reset starts over
    assert_eq!(delays, 4);
    backoff.reset();
    assert!(backoff.next_backoff().is_some());
}

#[test]
fn given_single_attempt_policy_when_backoff_iterated_then_empty() {
    let mut backoff = RetryPolicy::single_attempt().backoff();

    assert_eq!(backoff.next_backoff(), None);
}

/// **VALUE**: Verifies invalid policies are rejected.
///
/// **WHY THIS MATTERS**: `max_attempts == 0` would otherwise run nothing and report an
/// exhausted error with no cause.
///
/// **BUG THIS CATCHES**: Would catch any bound being dropped from `validate`.
#[test]
fn given_invalid_policies_when_validated_then_rejected() {
    // GIVEN: Policies each breaking one bound
    let zero_attempts = RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::default()
    };
    let negative_jitter = RetryPolicy {
        jitter: -0.1,
        ..RetryPolicy::default()
    };
    let large_jitter = RetryPolicy {
        jitter: 1.5,
        ..RetryPolicy::default()
    };
    let nan_multiplier = RetryPolicy {
        multiplier: f64::NAN,
        ..RetryPolicy::default()
    };
    let inverted = RetryPolicy {
        base_delay: Duration::from_secs(60),
        ..RetryPolicy::default()
    };

    // THEN: Each is rejected with a reason naming the bound
    let reason = |p: &RetryPolicy| p.validate().unwrap_err().to_string();
    assert!(reason(&zero_attempts).contains("max_attempts"));
    assert!(reason(&negative_jitter).contains("jitter"));
    assert!(reason(&large_jitter).contains("jitter"));
    assert!(reason(&nan_multiplier).contains("multiplier"));
    assert!(reason(&inverted).contains("base_delay"));
}

#[test]
fn given_presets_when_validated_then_all_valid() {
    assert!(RetryPolicy::default().validate().is_ok());
    assert!(RetryPolicy::aggressive().validate().is_ok());
    assert!(RetryPolicy::single_attempt().validate().is_ok());

    let aggressive = RetryPolicy::aggressive();
    assert_eq!(aggressive.max_attempts, 5);
    assert_eq!(aggressive.base_delay, Duration::from_millis(500));
    assert_eq!(aggressive.max_delay, Duration::from_secs(10));
}
