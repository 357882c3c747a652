//! Retry policies for [`Bot::call_with_retry`](crate::Bot::call_with_retry).
//!
//! A policy is only consulted for failures that left the request unsent or
//! half-sent for reasons outside the caller's control (see
//! [`InvocationError::is_retryable`]). Encode errors, decode errors,
//! cancelled bodies and answers from the server are returned as they are.
//! Every retry encodes a fresh request, so uploads are read from the start.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::errors::InvocationError;

/// Decides whether, and after how long, a failed call is attempted again.
pub trait RetryPolicy: Send + Sync + 'static {
    /// `attempt` counts the failed calls so far, starting at 1. `None`
    /// gives up and returns `error` to the caller.
    fn next_delay(&self, attempt: NonZeroU32, error: &InvocationError) -> Option<Duration>;
}

/// Never retry. The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRetries;

impl RetryPolicy for NoRetries {
    fn next_delay(&self, _: NonZeroU32, _: &InvocationError) -> Option<Duration> { None }
}

/// Retry up to `max_attempts` calls in total, doubling the delay after each
/// failure.
#[derive(Clone, Copy, Debug)]
pub struct Backoff {
    pub max_attempts: u32,
    pub initial:      Duration,
    pub max_delay:    Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial:      Duration::from_millis(500),
            max_delay:    Duration::from_secs(8),
        }
    }
}

impl RetryPolicy for Backoff {
    fn next_delay(&self, attempt: NonZeroU32, _: &InvocationError) -> Option<Duration> {
        if attempt.get() >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt.get() - 1).unwrap_or(u32::MAX);
        Some(self.initial.saturating_mul(factor).min(self.max_delay))
    }
}
