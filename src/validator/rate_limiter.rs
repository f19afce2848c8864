// ABOUTME: Request pacer for phone lookups - a token bucket kept as a schedule of send slots.
// ABOUTME: Each acquire reserves the next free slot and sleeps until it opens.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces lookups at `per_second` on average, letting `burst` go out at once.
///
/// The bucket is tracked as the instant the next slot opens when the bucket
/// is empty (`next_free`). A caller may go `burst - 1` intervals ahead of it.
/// Reserving under the lock and sleeping outside it keeps concurrent lookups
/// from polling each other.
pub struct RateLimiter {
    next_free: Mutex<Instant>,
    interval: Duration,
    burst: u32,
}

impl RateLimiter {
    /// # Panics
    ///
    /// Panics if `burst` is zero or `per_second` is not a positive finite number.
    pub fn new(burst: u32, per_second: f64) -> Self {
        assert!(burst >= 1, "burst must allow at least one lookup");
        assert!(
            per_second.is_finite() && per_second > 0.0,
            "per_second must be positive"
        );

        Self {
            next_free: Mutex::new(Instant::now()),
            interval: Duration::from_secs_f64(1.0 / per_second),
            burst,
        }
    }

    /// Gap between slots once the burst is spent.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserve a slot and wait for it.
    ///
    /// The slot stays consumed if the caller stops waiting, so a timed-out
    /// lookup still counts against the rate.
    pub async fn acquire(&self) {
        let opens_at = self.reserve().await;
        tokio::time::sleep_until(opens_at).await;
    }

    /// Claim the next slot and return when it opens.
    async fn reserve(&self) -> Instant {
        let mut next_free = self.next_free.lock().await;
        let now = Instant::now();
        let slack = self.interval * (self.burst - 1);

        let base = (*next_free).max(now);
        let opens_at = base.checked_sub(slack).map_or(now, |t| t.max(now));
        *next_free = base + self.interval;
        opens_at
    }
}
