use std::cell::{Cell, RefCell};
use std::time::Duration;

use super::*;

#[test]
fn default_policy_is_three_retries_one_second() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries(), 3);
    assert_eq!(policy.base_delay(), Duration::from_secs(1));
}

#[test]
fn delays_grow_linearly() {
    let policy = RetryPolicy::new(3, Duration::from_millis(100));
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(300));
}

#[tokio::test]
async fn succeeds_after_transient_failures() {
    let policy = RetryPolicy::new(3, Duration::from_millis(10));
    let calls = Cell::new(0);
    let slept = RefCell::new(Vec::new());

    let result = policy
        .run(
            "posts",
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(ProviderError::Transport("offline".into()))
                    } else {
                        Ok(n)
                    }
                }
            },
            |d| {
                slept.borrow_mut().push(d);
                async {}
            },
        )
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(*slept.borrow(), vec![Duration::from_millis(10), Duration::from_millis(20)]);
}

#[tokio::test]
async fn gives_up_after_budget_is_spent() {
    let policy = RetryPolicy::new(3, Duration::from_millis(1));
    let calls = Cell::new(0);

    let result: Result<(), ProviderError> = policy
        .run(
            "profile",
            || {
                calls.set(calls.get() + 1);
                async { Err(ProviderError::from_status(503, String::new())) }
            },
            |_| async {},
        )
        .await;

    assert!(matches!(result, Err(ProviderError::Unavailable { status: 503, .. })));
    assert_eq!(calls.get(), 4);
}

#[tokio::test]
async fn does_not_retry_rejected_requests() {
    let policy = RetryPolicy::default();
    let calls = Cell::new(0);
    let sleeps = Cell::new(0);

    let result: Result<(), ProviderError> = policy
        .run(
            "profile",
            || {
                calls.set(calls.get() + 1);
                async { Err(ProviderError::from_status(404, "not found".into())) }
            },
            |_| {
                sleeps.set(sleeps.get() + 1);
                async {}
            },
        )
        .await;

    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
    assert_eq!(sleeps.get(), 0);
}
