//! Minimum-interval gate between successive network operations.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

/// Spaces calls to [`wait`](Pacer::wait) at least `min_interval` apart.
///
/// The first call never waits. Runs on the tokio clock, so paused-time tests
/// advance instantly.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// A pacer that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until `min_interval` has passed since the previous call returned.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "pacing");
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_wait() {
        let mut pacer = Pacer::new(Duration::from_secs(3));
        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn successive_calls_are_spaced() {
        let mut pacer = Pacer::new(Duration::from_secs(3));
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(6));
        assert!(start.elapsed() < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn time_spent_elsewhere_counts() {
        let mut pacer = Pacer::new(Duration::from_secs(3));
        pacer.wait().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        let before = Instant::now();
        pacer.wait().await;
        let waited = before.elapsed();
        assert!(waited >= Duration::from_secs(1));
        assert!(waited < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_never_waits() {
        let mut pacer = Pacer::disabled();
        let start = Instant::now();
        for _ in 0..10 {
            pacer.wait().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
