//! Virtual user contract.

use crate::duration::{parse_duration, DurationParseError};
use async_trait::async_trait;
use rand::Rng;
use std::str::FromStr;
use std::time::Duration;

/// Error returned when a virtual user fails to initialize.
pub type UserError = Box<dyn std::error::Error + Send + Sync>;

/// A simulated concurrent client.
///
/// The runner calls `on_start` once, then `task` repeatedly with the
/// configured wait in between, then `on_stop` once. A user is never stopped
/// while `task` is running.
#[async_trait]
pub trait VirtualUser: Send {
    /// Initialize the user. An error aborts this user only.
    async fn on_start(&mut self) -> Result<(), UserError> {
        Ok(())
    }

    /// Run one unit of work.
    async fn task(&mut self);

    async fn on_stop(&mut self) {}
}

/// Delay between two consecutive tasks of the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTime {
    /// Always wait the same amount
    Constant(Duration),
    /// Wait a uniformly random amount in `[min, max]`
    Between(Duration, Duration),
}

impl Default for WaitTime {
    fn default() -> Self {
        WaitTime::Constant(Duration::from_secs(1))
    }
}

impl WaitTime {
    /// Pick the next delay.
    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        match *self {
            WaitTime::Constant(delay) => delay,
            WaitTime::Between(min, max) if max > min => {
                let millis = rng.gen_range(min.as_millis()..=max.as_millis());
                Duration::from_millis(millis as u64)
            }
            WaitTime::Between(min, _) => min,
        }
    }
}

impl FromStr for WaitTime {
    type Err = DurationParseError;

    /// Parse `"1s"` as a constant wait or `"1s..3s"` as a random wait.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("..") {
            Some((min, max)) => {
                let (min, max) = (parse_duration(min)?, parse_duration(max)?);
                if max < min {
                    return Err(DurationParseError::Invalid(s.trim().to_string()));
                }
                Ok(WaitTime::Between(min, max))
            }
            None => Ok(WaitTime::Constant(parse_duration(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_constant_wait() {
        let mut rng = StdRng::seed_from_u64(42);
        let wait = WaitTime::Constant(Duration::from_millis(250));

        for _ in 0..10 {
            assert_eq!(wait.next_delay(&mut rng), Duration::from_millis(250));
        }
    }

    #[test]
    fn test_between_wait_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let wait = WaitTime::Between(Duration::from_millis(100), Duration::from_millis(200));

        for _ in 0..100 {
            let delay = wait.next_delay(&mut rng);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(200));
        }
    }

    #[test]
    fn test_between_with_inverted_bounds_uses_min() {
        let mut rng = StdRng::seed_from_u64(42);
        let wait = WaitTime::Between(Duration::from_millis(300), Duration::from_millis(100));

        assert_eq!(wait.next_delay(&mut rng), Duration::from_millis(300));
    }

    #[test]
    fn test_parse_wait_time() {
        assert_eq!(
            "250ms".parse::<WaitTime>().unwrap(),
            WaitTime::Constant(Duration::from_millis(250))
        );
        assert_eq!(
            "1s..3s".parse::<WaitTime>().unwrap(),
            WaitTime::Between(Duration::from_secs(1), Duration::from_secs(3))
        );
        assert_eq!(
            "500ms .. 2s".parse::<WaitTime>().unwrap(),
            WaitTime::Between(Duration::from_millis(500), Duration::from_secs(2))
        );
    }

    #[test]
    fn test_parse_wait_time_errors() {
        assert_eq!(
            "3s..1s".parse::<WaitTime>(),
            Err(DurationParseError::Invalid("3s..1s".to_string()))
        );
        assert_eq!("1s..".parse::<WaitTime>(), Err(DurationParseError::Empty));
        assert!("fast".parse::<WaitTime>().is_err());
    }

    #[test]
    fn test_default_wait_is_one_second() {
        assert_eq!(
            WaitTime::default(),
            WaitTime::Constant(Duration::from_secs(1))
        );
    }
}
