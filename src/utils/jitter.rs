//! Randomized delays for polite crawling
//!
//! Frame fetches are spaced out by a random pause so that bursts of requests
//! against the same upstream look less like a bot.

use rand::{Rng, rng};
use std::time::Duration;

/// Pick a delay uniformly from `[min, max]`
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stream_resolver::utils::jitter::random_delay;
///
/// let delay = random_delay(Duration::from_millis(100), Duration::from_millis(300));
/// assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(300));
/// ```
pub fn random_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    Duration::from_millis(rng().random_range(min_ms..=max_ms))
}
