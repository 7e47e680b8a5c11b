use rand::random;
use std::time::Duration;

use crate::config::LlmConfig;

/// Explicit retry schedule for backend calls: bounded attempts with
/// exponential backoff, jittered, capped at a maximum delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            initial_delay: Duration::from_millis(config.retry_initial_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }

    /// Delay before retrying after the given failed attempt (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let jitter_factor = 1.0 + (random::<f64>() - 0.5) * 2.0 * self.jitter;
        let jittered = base * jitter_factor;
        let clamped = jittered.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(clamped)
    }
}
