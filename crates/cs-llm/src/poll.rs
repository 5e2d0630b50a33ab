//! Fixed-interval poller for asynchronous model runs
//!
//! Checks the run every `interval` until it reaches a terminal status. There
//! is no attempt cap and no wall-clock deadline; callers that need one wrap
//! the call in `tokio::time::timeout`.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Outcome of one status check
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    Pending,
    Done(T),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from_millis(1000)
    }
}

/// Call `check` until it reports `Done` or `Failed`. Errors from `check` end
/// the cycle immediately.
pub async fn poll_until<T, F, Fut>(config: &PollConfig, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus<T>>>,
{
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match check().await? {
            PollStatus::Done(value) => return Ok(value),
            PollStatus::Failed(reason) => return Err(anyhow!("Run failed: {}", reason)),
            PollStatus::Pending => {
                debug!("Run still pending (check {})", attempt);
                tokio::time::sleep(config.interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_completes_after_pending() {
        let calls = AtomicU32::new(0);
        let config = PollConfig::from_millis(1);

        let value = poll_until(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(if n < 2 {
                    PollStatus::Pending
                } else {
                    PollStatus::Done("finished")
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "finished");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_long_runs_are_not_abandoned() {
        let calls = AtomicU32::new(0);
        let config = PollConfig::from_millis(0);

        let value = poll_until(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok(if n < 250 {
                    PollStatus::Pending
                } else {
                    PollStatus::Done(n)
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 250);
        assert_eq!(calls.load(Ordering::SeqCst), 251);
    }

    #[tokio::test]
    async fn test_caller_timeout_stops_pending_run() {
        let config = PollConfig::from_millis(5);
        let polled = tokio::time::timeout(
            Duration::from_millis(50),
            poll_until::<(), _, _>(&config, || async { Ok(PollStatus::Pending) }),
        )
        .await;
        assert!(polled.is_err());
    }

    #[tokio::test]
    async fn test_failure_stops_polling() {
        let config = PollConfig::from_millis(1);
        let err = poll_until::<(), _, _>(&config, || async {
            Ok(PollStatus::Failed("rate limited".to_string()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Run failed: rate limited");
    }
}
