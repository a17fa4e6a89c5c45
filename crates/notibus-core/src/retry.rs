// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exponential backoff for transient delivery failures.
//!
//! The policy bounds only the logical operation it wraps; callers run
//! concurrently and a stalled retry chain never blocks its siblings.

use std::time::Duration;

use tracing::warn;

use crate::error::NotibusError;

/// Retry parameters for one category of external call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// A terminal failure, carrying how many retries were spent on it.
#[derive(Debug)]
pub struct RetryError {
    pub error: NotibusError,
    pub retries: u32,
}

/// Run `operation` until it succeeds, the error is permanent, or the retry
/// ceiling is reached.
///
/// Permanent errors (`NotibusError::is_retryable() == false`) are returned
/// immediately with zero backoff.
pub async fn run<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NotibusError>>,
{
    let mut retries = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && retries < policy.max_retries => {
                retries += 1;
                warn!(
                    operation = operation_name,
                    attempt = retries,
                    error = %error,
                    "retrying after transient failure"
                );
                tokio::time::sleep(policy.delay_for(retries)).await;
            }
            Err(error) => return Err(RetryError { error, retries }),
        }
    }
}
