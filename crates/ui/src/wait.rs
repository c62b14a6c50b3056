//! Bounded polling for page state

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use checkrun_common::Result;

/// Poll interval and deadline for state queries
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Re-evaluate `probe` until it yields true or the deadline passes.
    ///
    /// Returns `Ok(false)` only once the timeout has elapsed. Errors from
    /// the probe end the wait immediately.
    pub async fn until<F, Fut>(&self, mut probe: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if probe().await? {
                return Ok(true);
            }
            if start.elapsed() >= self.timeout {
                tracing::debug!("Condition not met after {} attempts", attempts);
                return Ok(false);
            }
            sleep(self.interval).await;
        }
    }
}

impl Default for Wait {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkrun_common::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_true_after_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let wait = Wait::new(Duration::from_secs(2), Duration::from_millis(5));
        let met = wait
            .until(move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 3) })
            .await
            .unwrap();
        assert!(met);
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_false_only_after_deadline() {
        let wait = Wait::new(Duration::from_millis(60), Duration::from_millis(10));
        let start = Instant::now();
        let met = wait.until(|| async { Ok(false) }).await.unwrap();
        assert!(!met);
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_probe_error_propagates() {
        let wait = Wait::new(Duration::from_secs(5), Duration::from_millis(10));
        let result = wait
            .until(|| async { Err(Error::Driver("session gone".into())) })
            .await;
        assert!(matches!(result, Err(Error::Driver(_))));
    }
}
