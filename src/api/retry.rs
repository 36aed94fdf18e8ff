use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use super::error::{ApiError, ErrorKind};

/// Which failures are worth another attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
  /// Retry every failure the same way, including 4xx responses
  Uniform,
  /// Give up immediately on auth and other client errors
  #[default]
  StatusAware,
}

impl RetryMode {
  fn should_retry(self, err: &ApiError) -> bool {
    match self {
      RetryMode::Uniform => true,
      RetryMode::StatusAware => !matches!(err.kind, ErrorKind::Unauthorized | ErrorKind::Client),
    }
  }
}

/// Bounded retry with linear backoff.
///
/// After failed attempt `n` (1-based) the policy sleeps `base_delay * n`
/// before trying again. No jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
  pub attempts: u32,
  pub base_delay: Duration,
  pub mode: RetryMode,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      attempts: 3,
      base_delay: Duration::from_millis(1000),
      mode: RetryMode::default(),
    }
  }
}

impl RetryPolicy {
  /// Policy that never waits between attempts.
  #[cfg(test)]
  pub fn immediate(attempts: u32, mode: RetryMode) -> Self {
    Self {
      attempts,
      base_delay: Duration::ZERO,
      mode,
    }
  }

  /// Delay slept after the given failed attempt (1-based). Saturates
  /// instead of overflowing for huge configured delays.
  pub fn delay_after(&self, attempt: u32) -> Duration {
    self.base_delay.saturating_mul(attempt)
  }

  /// Run `operation` until it succeeds, the error is not retryable, or the
  /// attempt budget is spent. The last error is returned unmodified.
  pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ApiError>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
  {
    let attempts = self.attempts.max(1);
    let mut attempt = 1;

    loop {
      match operation().await {
        Ok(value) => return Ok(value),
        Err(err) if attempt >= attempts => {
          warn!("Request failed after {} attempts: {}", attempts, err);
          return Err(err);
        }
        Err(err) if !self.mode.should_retry(&err) => {
          warn!("Request failed with non-retryable error: {}", err);
          return Err(err);
        }
        Err(err) => {
          let delay = self.delay_after(attempt);
          warn!(
            "Request failed (attempt {}/{}): {}, retrying in {:?}",
            attempt, attempts, err, delay
          );
          sleep(delay).await;
          attempt += 1;
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use tokio::time::Instant;

  fn server_error() -> ApiError {
    ApiError::from_response(500, b"")
  }

  #[tokio::test(start_paused = true)]
  async fn test_linear_backoff_until_success() {
    let calls = AtomicU32::new(0);
    let mut instants = Vec::new();
    let policy = RetryPolicy::default();

    let result = policy
      .run(|| {
        instants.push(Instant::now());
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
          if n < 3 {
            Err(server_error())
          } else {
            Ok(n)
          }
        }
      })
      .await;

    assert_eq!(result, Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(instants[1] - instants[0], Duration::from_millis(1000));
    assert_eq!(instants[2] - instants[1], Duration::from_millis(2000));
  }

  #[tokio::test(start_paused = true)]
  async fn test_last_error_propagates_unmodified() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::default();

    let result: Result<(), _> = policy
      .run(|| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Err(ApiError::network(format!("connection refused #{}", n))) }
      })
      .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(result, Err(ApiError::network("connection refused #3")));
  }

  #[tokio::test]
  async fn test_uniform_mode_retries_client_errors() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::immediate(3, RetryMode::Uniform);

    let result: Result<(), _> = policy
      .run(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::from_response(401, b"")) }
      })
      .await;

    assert_eq!(result.map_err(|e| e.kind), Err(ErrorKind::Unauthorized));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_status_aware_mode_fails_fast_on_client_errors() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::immediate(3, RetryMode::StatusAware);

    let result: Result<(), _> = policy
      .run(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::from_response(422, b"")) }
      })
      .await;

    assert_eq!(result.map_err(|e| e.kind), Err(ErrorKind::Client));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_status_aware_mode_still_retries_rate_limits() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::immediate(3, RetryMode::StatusAware);

    let result: Result<(), _> = policy
      .run(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::from_response(429, b"")) }
      })
      .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_zero_attempts_still_tries_once() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::immediate(0, RetryMode::Uniform);

    let result = policy
      .run(|| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, ApiError>(()) }
      })
      .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_huge_base_delay_saturates() {
    let policy = RetryPolicy {
      attempts: 3,
      base_delay: Duration::from_millis(u64::MAX),
      mode: RetryMode::Uniform,
    };

    assert_eq!(policy.delay_after(1), Duration::from_millis(u64::MAX));
    assert_eq!(policy.delay_after(2), Duration::MAX);
  }
}
