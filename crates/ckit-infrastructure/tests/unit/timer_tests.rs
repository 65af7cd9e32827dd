//! Tests for the timeout race

use ckit_domain::Error;
use ckit_domain::constants::{TIMEOUT_ERROR_CODE, TIMEOUT_ERROR_MSG};
use ckit_infrastructure::TimeoutTimer;
use ckit_infrastructure::constants::{TIMER_BUSY_MSG, TIMER_TERMINATED_MSG};
use std::time::Duration;
use tokio::time::sleep;

async fn delayed<T>(ms: u64, value: T) -> T {
    sleep(Duration::from_millis(ms)).await;
    value
}

#[tokio::test(start_paused = true)]
async fn test_task_finishing_first_returns_its_value() {
    let timer = TimeoutTimer::new();
    let res = timer
        .exec_or_timeout(delayed(1000, "x"), Duration::from_secs(3))
        .await
        .unwrap();

    assert_eq!(res.code, 0);
    assert_eq!(res.message, "");
    assert_eq!(res.result, Some("x"));
    assert!(res.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_deadline_first_returns_timeout_envelope() {
    let timer = TimeoutTimer::new();
    let started = tokio::time::Instant::now();
    let res = timer
        .exec_or_timeout(delayed(3000, "x"), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(res.code, TIMEOUT_ERROR_CODE);
    assert_eq!(res.message, TIMEOUT_ERROR_MSG);
    assert_eq!(res.result, None);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_failed_task_reports_timeout_code() {
    let timer = TimeoutTimer::new();
    let res = timer
        .try_exec_or_timeout(
            async { Err::<(), _>(Error::internal("lookup failed")) },
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert_eq!(res.code, TIMEOUT_ERROR_CODE);
    assert_eq!(res.message, TIMEOUT_ERROR_MSG);
    assert!(timer.is_terminated());
}

#[tokio::test(start_paused = true)]
async fn test_terminated_flag_tracks_the_race() {
    let timer = TimeoutTimer::new();
    assert!(!timer.is_terminated());

    let race = timer.exec_or_timeout(delayed(500, 1), Duration::from_secs(2));
    tokio::pin!(race);
    assert!(futures::poll!(race.as_mut()).is_pending());
    assert!(!timer.is_terminated());

    let res = race.await.unwrap();
    assert_eq!(res.result, Some(1));
    assert!(timer.is_terminated());
}

#[tokio::test(start_paused = true)]
async fn test_reuse_without_renew_fails() {
    let timer = TimeoutTimer::new();
    timer
        .exec_or_timeout(async { 1 }, Duration::from_secs(1))
        .await
        .unwrap();

    let err = timer
        .exec_or_timeout(async { 2 }, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(err.to_string().contains(TIMER_TERMINATED_MSG));
}

#[tokio::test(start_paused = true)]
async fn test_renew_allows_another_race() {
    let timer = TimeoutTimer::new();
    timer
        .exec_or_timeout(delayed(2000, "slow"), Duration::from_secs(1))
        .await
        .unwrap();

    timer.renew();
    assert!(!timer.is_terminated());
    let res = timer
        .exec_or_timeout(async { "fast" }, Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(res.result, Some("fast"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_race_is_rejected() {
    let timer = TimeoutTimer::new();
    let first = timer.exec_or_timeout(delayed(1000, "a"), Duration::from_secs(5));
    tokio::pin!(first);
    assert!(futures::poll!(first.as_mut()).is_pending());

    let err = timer
        .exec_or_timeout(async { "b" }, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(err.to_string().contains(TIMER_BUSY_MSG));

    let res = first.await.unwrap();
    assert_eq!(res.result, Some("a"));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_a_started_race_terminates_the_timer() {
    let timer = TimeoutTimer::new();
    {
        let race = timer.exec_or_timeout(delayed(1000, ()), Duration::from_secs(5));
        tokio::pin!(race);
        assert!(futures::poll!(race.as_mut()).is_pending());
    }
    assert!(timer.is_terminated());

    timer.renew();
    let res = timer
        .exec_or_timeout(async { 7 }, Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(res.result, Some(7));
}
