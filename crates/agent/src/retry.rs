//! Bounded exponential backoff for LLM calls.
//!
//! The policy is a pure decision function: given how many attempts have
//! been made and how the last one failed, it says whether to wait and try
//! again. Sleeping is left to the caller, so the policy can be tested
//! without a clock.

use std::time::Duration;
use truthlens_config::SummarizationConfig;
use truthlens_core::error::SummarizeError;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then issue the next attempt.
    Retry { delay: Duration },
    /// Stop calling the provider.
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each later one.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &SummarizationConfig) -> Self {
        Self::new(config.max_retries, config.base_delay(), config.max_delay())
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Decide after attempt number `attempt` (1-based) failed with `error`.
    pub fn decide(&self, attempt: u32, error: &SummarizeError) -> RetryDecision {
        if !error.is_retryable() || attempt > self.max_retries {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry {
            delay: self.delay_for(attempt.saturating_sub(1)),
        }
    }

    /// Total attempts this policy allows, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
