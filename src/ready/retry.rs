//! Timed retry
//!
//! The host owns the timer; a [`Retry`] only decides, at each tick, whether
//! the condition holds, whether to keep going, or whether to give up.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval and attempt limit for a [`Retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay between checks
    pub interval: Duration,
    /// Maximum number of checks (None = unlimited)
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

/// Outcome of one [`Retry::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Condition held; stop the timer
    Satisfied,
    /// Check again after the interval
    Pending,
    /// Attempt limit reached; stop the timer
    Exhausted,
}

impl RetryStep {
    /// Whether the timer driving the retry should stop
    pub fn is_final(self) -> bool {
        !matches!(self, RetryStep::Pending)
    }
}

/// A condition polled until it holds or the attempt limit is reached.
/// Once final, further ticks repeat the final step without re-checking.
pub struct Retry<F> {
    policy: RetryPolicy,
    condition: F,
    attempts: u32,
    finished: Option<RetryStep>,
}

impl<F: FnMut() -> bool> Retry<F> {
    pub fn new(policy: RetryPolicy, condition: F) -> Self {
        Self {
            policy,
            condition,
            attempts: 0,
            finished: None,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Checks performed so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Check the condition once
    pub fn tick(&mut self) -> RetryStep {
        if let Some(step) = self.finished {
            return step;
        }

        self.attempts += 1;
        let step = if (self.condition)() {
            RetryStep::Satisfied
        } else if self
            .policy
            .max_attempts
            .is_some_and(|max| self.attempts >= max)
        {
            RetryStep::Exhausted
        } else {
            RetryStep::Pending
        };

        if step.is_final() {
            self.finished = Some(step);
        }
        step
    }
}
