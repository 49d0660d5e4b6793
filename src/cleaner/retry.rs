use std::time::Duration;

use crate::common::config::Config;

/// Bounded retry with a fixed pause between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_attempts, config.retry_backoff())
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// `on_retry` sees the attempt number (1-based) and error of every failure
    /// that will be retried. At least one attempt is always made. Returns the
    /// last error together with the number of attempts made.
    pub fn run<T, E>(
        &self,
        mut op: impl FnMut() -> Result<T, E>,
        mut on_retry: impl FnMut(u32, &E),
    ) -> Result<T, (E, u32)> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    on_retry(attempt, &e);
                    std::thread::sleep(self.backoff);
                    attempt += 1;
                }
                Err(e) => return Err((e, attempt)),
            }
        }
    }
}
