//! Reconnect policy for the poll loop

use serde::Deserialize;
use std::time::Duration;

/// How long to wait before re-issuing a poll
///
/// `Immediate` re-polls as soon as the previous request completes, whether
/// it succeeded or not. `Backoff` waits `initial * 2^(failures - 1)`, capped
/// at `max`, after consecutive failures and re-polls immediately after a
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    #[default]
    Immediate,
    Backoff { initial: Duration, max: Duration },
}

/// Name of a reconnect strategy as written in config files and env vars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectStrategy {
    #[default]
    Immediate,
    Backoff,
}

impl std::str::FromStr for ReconnectStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(ReconnectStrategy::Immediate),
            "backoff" => Ok(ReconnectStrategy::Backoff),
            other => Err(format!("unknown reconnect strategy: {}", other)),
        }
    }
}

impl ReconnectPolicy {
    /// Exponential backoff between `initial` and `max`
    pub fn backoff(initial: Duration, max: Duration) -> Self {
        ReconnectPolicy::Backoff { initial, max }
    }

    /// Delay before the next poll given the current run of failed polls
    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        match *self {
            ReconnectPolicy::Immediate => Duration::ZERO,
            ReconnectPolicy::Backoff { initial, max } => {
                if consecutive_failures == 0 {
                    return Duration::ZERO;
                }
                // Exponent capped to keep the multiplier from overflowing
                let exponent = (consecutive_failures - 1).min(16);
                initial.saturating_mul(1u32 << exponent).min(max)
            }
        }
    }
}
