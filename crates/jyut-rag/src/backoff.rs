use std::time::Duration;

use jyut_config::upload::UploadConfig;

/// Exponential backoff: `base * 2^attempt`, capped
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
    pub max_retries: u32,
}

impl Backoff {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            max: Duration::from_millis(config.max_delay_ms),
            max_retries: config.max_retries,
        }
    }

    /// Delay before retry number `attempt` (0-based), `None` once retries are exhausted
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }

        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        Some(self.base.saturating_mul(factor).min(self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff() -> Backoff {
        Backoff {
            base: Duration::from_millis(100),
            max: Duration::from_millis(1000),
            max_retries: 6,
        }
    }

    #[test]
    fn doubles_until_cap() {
        let b = backoff();
        assert_eq!(b.delay(0), Some(Duration::from_millis(100)));
        assert_eq!(b.delay(1), Some(Duration::from_millis(200)));
        assert_eq!(b.delay(3), Some(Duration::from_millis(800)));
        assert_eq!(b.delay(4), Some(Duration::from_millis(1000)));
        assert_eq!(b.delay(5), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn stops_after_max_retries() {
        assert_eq!(backoff().delay(6), None);
    }

    #[test]
    fn huge_attempt_does_not_overflow() {
        let b = Backoff {
            max_retries: u32::MAX,
            ..backoff()
        };
        assert_eq!(b.delay(64), Some(Duration::from_millis(1000)));
    }
}
