use std::time::Duration;

use tokio::time::{self, Instant};

/// Paces a loop to a fixed cadence.
///
/// Every call to [`sync`](Throttler::sync) waits until at least the
/// configured interval has elapsed since the previous call returned, then
/// resets. A loop body that finishes early is slowed down to the cadence; a
/// body that overruns is not penalized further, so drift never accumulates
/// beyond one interval.
pub struct Throttler {
    interval: Duration,
    last: Instant,
}

impl Throttler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Blocks until the interval has passed since the previous sync.
    pub async fn sync(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.interval {
            time::sleep(self.interval - elapsed).await;
        }
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sync_enforces_minimum_spacing() {
        let mut throttler = Throttler::new(Duration::from_millis(100));

        let start = Instant::now();
        throttler.sync().await;
        throttler.sync().await;
        throttler.sync().await;

        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_body_is_not_delayed_further() {
        let mut throttler = Throttler::new(Duration::from_millis(50));
        throttler.sync().await;

        // Simulate a loop body that overruns the interval.
        time::sleep(Duration::from_millis(200)).await;

        let before = Instant::now();
        throttler.sync().await;
        assert!(before.elapsed() < Duration::from_millis(50));
    }
}
