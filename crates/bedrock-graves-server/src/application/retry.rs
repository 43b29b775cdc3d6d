//! Bounded retries with exponential backoff measured in ticks.
//!
//! Used where a host-side operation can fail transiently, such as creating a
//! grave while its chunk is still loading.  The first attempt runs
//! immediately; later attempts are scheduled on the [`TaskQueue`].

use tracing::{error, info, warn};

use super::deferred::TaskQueue;

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after that.
    pub base_delay_ticks: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ticks: 1,
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> u64 {
        let shift = attempt.saturating_sub(1).min(32);
        self.base_delay_ticks.saturating_mul(1u64 << shift)
    }
}

/// Runs `op` now and, on failure, retries it through `queue` according to
/// `policy`.  After the last failed attempt the operation is abandoned and
/// logged at error level.
pub fn run_with_retry<F>(queue: &TaskQueue, name: impl Into<String>, policy: RetryPolicy, op: F)
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    attempt(queue, name.into(), policy, op, 1);
}

fn attempt<F>(queue: &TaskQueue, name: String, policy: RetryPolicy, mut op: F, number: u32)
where
    F: FnMut() -> anyhow::Result<()> + Send + 'static,
{
    match op() {
        Ok(()) => {
            if number > 1 {
                info!("{name} succeeded on attempt {number}");
            }
        }
        Err(e) if number < policy.max_attempts => {
            let delay = policy.delay_after(number);
            warn!(
                "{name} failed on attempt {number}/{}: {e:#}; retrying in {delay} tick(s)",
                policy.max_attempts
            );
            queue.submit_after(delay, move |queue: &TaskQueue| {
                attempt(queue, name, policy, op, number + 1);
                Ok(())
            });
        }
        Err(e) => {
            error!("{name} failed after {number} attempt(s), giving up: {e:#}");
        }
    }
}
