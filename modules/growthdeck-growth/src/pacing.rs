//! Fixed inter-call delay for sequential API orchestration.
//!
//! The pauses between profile lookups and between welcome messages are part
//! of the pipeline contract (deliberate rate limiting), so the pacing lives
//! in one tested primitive instead of ad-hoc sleeps at each call site. The
//! delay is fixed — not jittered, not adaptive.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay — for tests.
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run the call, then hold for the fixed delay.
    pub async fn paced<T, F>(&self, call: F) -> T
    where
        F: Future<Output = T>,
    {
        let out = call.await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn none_returns_immediately() {
        let pacing = Pacing::none();
        let value = pacing.paced(async { 41 + 1 }).await;
        assert_eq!(value, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn paced_holds_for_the_fixed_delay() {
        let pacing = Pacing::new(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        pacing.paced(async {}).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
