use std::fmt::Display;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Bounded retries with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// Returns `None` after the last failed attempt; every failure is logged
    /// with `label`. At least one attempt is always made.
    pub fn run<T, E, F>(&self, label: &str, mut op: F) -> Option<T>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.retries.max(1);
        for attempt in 1..=attempts {
            match op() {
                Ok(value) => return Some(value),
                Err(err) => {
                    warn!("Attempt {attempt} failed for {label}: {err}");
                    if attempt < attempts {
                        thread::sleep(self.delay);
                    }
                }
            }
        }
        warn!("Max retries reached for {label}. Skipping.");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn instant(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = instant(3).run("COG=COG0001", || {
            calls += 1;
            if calls < 3 {
                Err("connection reset")
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Some(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_retries() {
        let mut calls = 0;
        let result: Option<()> = instant(3).run("EC=1.1.1.1", || {
            calls += 1;
            Err("timeout")
        });
        assert_eq!(result, None);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_fixed_delay_between_attempts_only() {
        let delay = Duration::from_millis(40);
        let policy = RetryPolicy { retries: 3, delay };
        let mut attempts: Vec<Instant> = Vec::new();
        let result: Option<()> = policy.run("EC=2.7.7.7", || {
            attempts.push(Instant::now());
            Err("connection reset")
        });
        let returned = Instant::now();

        assert_eq!(result, None);
        assert_eq!(attempts.len(), 3);
        for pair in attempts.windows(2) {
            assert!(pair[1] - pair[0] >= delay);
        }
        assert!(attempts[2] - attempts[0] >= delay * 2);
        // no sleep after the final attempt
        assert!(returned - attempts[2] < delay);
    }

    #[test]
    fn test_no_delay_after_success() {
        let delay = Duration::from_millis(40);
        let policy = RetryPolicy { retries: 3, delay };
        let mut calls = 0;
        let start = Instant::now();
        let result = policy.run("COG=COG0085", || {
            calls += 1;
            if calls == 1 {
                Err("timeout")
            } else {
                Ok(calls)
            }
        });
        let elapsed = start.elapsed();
        assert_eq!(result, Some(2));
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2);
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let mut calls = 0;
        let result = instant(0).run("x", || {
            calls += 1;
            Ok::<_, String>(())
        });
        assert_eq!(result, Some(()));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_matches_service_limits() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.delay, Duration::from_secs(60));
    }
}
