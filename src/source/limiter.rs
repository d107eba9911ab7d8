//! Token-less request pacing.
//!
//! A single last-request timestamp, not a token bucket: with one adapter
//! instance and serialized calls, bursts beyond one in-flight request are
//! impossible by construction. Each adapter owns its own pacer; nothing is
//! shared process-wide.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between outbound requests.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep until the minimum interval since the previous request has
    /// elapsed, then claim the slot for the caller's request.
    pub async fn pace(&self) {
        let wait = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let wait = match *last {
                Some(prev) => (prev + self.min_interval).saturating_duration_since(now),
                None => Duration::ZERO,
            };
            // Claim the slot before sleeping so an interleaved caller
            // queues behind this request rather than alongside it.
            *last = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit delay");
            tokio::time::sleep(wait).await;
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_request_is_not_delayed() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let start = std::time::Instant::now();
        pacer.pace().await;
        assert!(start.elapsed() < Duration::from_millis(40));
    }

    #[tokio::test]
    async fn second_request_waits_out_the_interval() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let start = std::time::Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn pacers_do_not_share_state() {
        let first = RequestPacer::new(Duration::from_millis(200));
        let second = RequestPacer::new(Duration::from_millis(200));

        first.pace().await;
        let start = std::time::Instant::now();
        second.pace().await;
        // A fresh pacer must not inherit the other instance's timestamp.
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
