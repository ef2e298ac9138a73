use std::fmt::Display;
use std::time::Duration;

/// Default number of attempts for a UI interaction
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Bounded, blocking retry of a fallible interaction.
///
/// Attempts run back-to-back unless a delay is configured. The first success
/// is returned immediately; when every attempt fails, the last error is
/// returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts (at least one)
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }

    /// Builder method: pause between attempts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// The operation receives the 1-based attempt number.
    pub fn execute<T, E, F>(&self, description: &str, mut operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt) {
                Ok(value) => {
                    log::debug!("{} succeeded on attempt {}", description, attempt);
                    return Ok(value);
                }
                Err(e) => {
                    log::warn!("{} failed on attempt {}/{}: {}", description, attempt, max_attempts, e);
                    if attempt >= max_attempts {
                        log::error!("All {} attempts to {} failed", max_attempts, description);
                        return Err(e);
                    }
                }
            }

            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_succeeds_on_third_attempt() {
        let calls = Cell::new(0);
        let result: Result<&str, String> = RetryPolicy::new(3).execute("click", |attempt| {
            calls.set(calls.get() + 1);
            if attempt < 3 {
                Err(format!("intercepted on attempt {}", attempt))
            } else {
                Ok("clicked")
            }
        });

        assert_eq!(result, Ok("clicked"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let calls = Cell::new(0);
        let result: Result<(), String> = RetryPolicy::new(3).execute("click", |attempt| {
            calls.set(calls.get() + 1);
            Err(format!("failure {}", attempt))
        });

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_first_success_stops() {
        let calls = Cell::new(0);
        let result: Result<u32, String> = RetryPolicy::default().execute("read", |_| {
            calls.set(calls.get() + 1);
            Ok(7)
        });

        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(0);
        let result: Result<(), &str> = policy.execute("click", |_| {
            calls.set(calls.get() + 1);
            Err("nope")
        });

        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(result, Err("nope"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_delay_between_attempts() {
        let policy = RetryPolicy::new(2).with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();
        let _: Result<(), &str> = policy.execute("click", |_| Err("nope"));

        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
