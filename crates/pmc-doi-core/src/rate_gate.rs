//! Process-wide pacing for outbound metadata calls
//!
//! The gate holds the instant of the previous acquisition behind an async
//! mutex. Waiters queue on the mutex (tokio's mutex is fair, so in arrival
//! order), sleep out the remainder of the interval while holding it, stamp
//! the new instant and release. The outbound request itself happens after
//! `acquire` returns, outside the lock.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between outbound calls
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_acquired: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_acquired: Mutex::new(None),
        }
    }

    /// One call per second
    pub fn per_second() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// acquisition returned, then claim the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_acquired.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tracing::debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "Rate gate waiting"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// When the last acquisition happened, if any
    pub async fn last_acquired(&self) -> Option<Instant> {
        *self.last_acquired.lock().await
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::per_second()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_does_not_wait() {
        let gate = RateGate::per_second();
        let start = Instant::now();

        gate.acquire().await;

        assert_eq!(Instant::now() - start, Duration::ZERO);
        assert!(gate.last_acquired().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_full_interval() {
        let gate = RateGate::per_second();
        let start = Instant::now();

        gate.acquire().await;
        gate.acquire().await;

        assert!(Instant::now() - start >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let gate = RateGate::per_second();
        gate.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let before = Instant::now();
        gate.acquire().await;

        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquisitions_are_spaced() {
        for n in [1usize, 2, 5, 10] {
            let gate = Arc::new(RateGate::per_second());
            let mut handles = Vec::new();

            for _ in 0..n {
                let gate = Arc::clone(&gate);
                handles.push(tokio::spawn(async move {
                    gate.acquire().await;
                    Instant::now()
                }));
            }

            let mut stamps = Vec::new();
            for handle in handles {
                stamps.push(handle.await.unwrap());
            }
            stamps.sort();

            assert_eq!(stamps.len(), n);
            for pair in stamps.windows(2) {
                assert!(
                    pair[1] - pair[0] >= Duration::from_secs(1),
                    "acquisitions {:?} apart with n = {}",
                    pair[1] - pair[0],
                    n
                );
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval() {
        let gate = RateGate::new(Duration::from_millis(250));
        let start = Instant::now();

        for _ in 0..4 {
            gate.acquire().await;
        }

        assert_eq!(gate.min_interval(), Duration::from_millis(250));
        assert!(Instant::now() - start >= Duration::from_millis(750));
    }
}
