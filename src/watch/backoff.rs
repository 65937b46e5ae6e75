//! Exponential backoff with jitter for watch re-subscription.

use std::time::Duration;

use rand::Rng;

/// Delay before re-subscription attempt `attempt` (1-based).
pub fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base).min(max_ms);

    // Jitter up to 10% keeps re-subscribing watchers from synchronizing.
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_exponentially() {
        let d1 = backoff_delay(1, 100, 30_000);
        assert!(d1.as_millis() >= 100);

        let d3 = backoff_delay(3, 100, 30_000);
        assert!(d3.as_millis() >= 400);
    }

    #[test]
    fn test_delay_is_capped() {
        let capped = backoff_delay(20, 100, 1000);
        assert!(capped.as_millis() >= 1000);
        assert!(capped.as_millis() <= 1100);
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        assert_eq!(backoff_delay(0, 100, 1000), Duration::from_millis(0));
    }
}
