//! Timeout race
//!
//! [`TimeoutTimer`] races a future against a deadline and always answers
//! with a [`CustomResult`]: the value on success, `ERR_TIMEOUT` otherwise.
//! One race per instance; call [`TimeoutTimer::renew`] to run another.

use crate::constants::{TIMER_BUSY_MSG, TIMER_TERMINATED_MSG};
use ckit_domain::constants::{TIMEOUT_ERROR_CODE, TIMEOUT_ERROR_MSG};
use ckit_domain::error::{Error, Result};
use ckit_domain::CustomResult;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error};

const LOG_PREFIX: &str = "[TimeoutTimer]";

/// Races tasks against a deadline
///
/// # Example
///
/// ```ignore
/// use ckit_infrastructure::TimeoutTimer;
/// use std::time::Duration;
///
/// let timer = TimeoutTimer::new();
/// let res = timer.exec_or_timeout(fetch_profile(), Duration::from_secs(3)).await?;
/// if !res.is_ok() {
///     // timed out
/// }
/// timer.renew();
/// ```
#[derive(Debug, Default)]
pub struct TimeoutTimer {
    terminated: AtomicBool,
    in_flight: AtomicBool,
}

/// Marks the race settled however the race future ends, including drop
struct RaceGuard<'a> {
    timer: &'a TimeoutTimer,
}

impl Drop for RaceGuard<'_> {
    fn drop(&mut self) {
        self.timer.terminated.store(true, Ordering::SeqCst);
        self.timer.in_flight.store(false, Ordering::SeqCst);
    }
}

impl TimeoutTimer {
    /// Create a fresh timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last race has settled and `renew` was not called since
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Allow the instance to run another race
    pub fn renew(&self) {
        self.terminated.store(false, Ordering::SeqCst);
    }

    /// Race a fallible task against `timeout`
    ///
    /// Returns `code = 0` with the value when the task wins. A timeout and a
    /// task failure both yield the `ERR_TIMEOUT` envelope; the failure is
    /// logged. Errors only when the timer is terminated or already racing.
    pub async fn try_exec_or_timeout<T, E, F>(
        &self,
        task: F,
        timeout: Duration,
    ) -> Result<CustomResult<T>>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        if self.is_terminated() {
            return Err(Error::invalid_state(TIMER_TERMINATED_MSG));
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::invalid_state(TIMER_BUSY_MSG));
        }
        let _guard = RaceGuard { timer: self };

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(value)) => Ok(CustomResult::new().with_result(value)),
            Ok(Err(e)) => {
                error!("{LOG_PREFIX} {e}");
                Ok(timeout_result())
            }
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis(), "{LOG_PREFIX} Task timed out");
                Ok(timeout_result())
            }
        }
    }

    /// Race an infallible task against `timeout`
    pub async fn exec_or_timeout<T, F>(&self, task: F, timeout: Duration) -> Result<CustomResult<T>>
    where
        F: Future<Output = T>,
    {
        self.try_exec_or_timeout(async { Ok::<T, Infallible>(task.await) }, timeout)
            .await
    }
}

fn timeout_result<T>() -> CustomResult<T> {
    CustomResult::new()
        .with_code(TIMEOUT_ERROR_CODE)
        .with_message(TIMEOUT_ERROR_MSG)
}
