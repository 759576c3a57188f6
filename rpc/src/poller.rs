use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::AdaptorError;

/// Attempts made while waiting for a transaction receipt to finalize.
pub const RECEIPT_FINALIZATION_ATTEMPTS: u32 = 5;
/// Attempts made for code lookups; a single attempt, no retry.
pub const CODE_FINALIZATION_ATTEMPTS: u32 = 1;

/// How a poll ended. Both variants carry the last observed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Finalized(T),
    /// The attempt budget ran out before the value was finalized.
    GivenUp(T),
}

impl<T> PollOutcome<T> {
    pub fn is_finalized(&self) -> bool {
        matches!(self, PollOutcome::Finalized(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            PollOutcome::Finalized(value) | PollOutcome::GivenUp(value) => value,
        }
    }
}

/// Retries a lookup once per block interval until the native chain reports
/// it finalized or the attempt budget is spent.
///
/// Running out of attempts is not an error: the caller gets the last value
/// it saw. Errors from the lookup itself abort the poll immediately.
#[derive(Debug, Clone, Copy)]
pub struct FinalizationPoller {
    attempts: u32,
    interval: Duration,
}

impl FinalizationPoller {
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn poll<T, F, Fut, P>(
        &self,
        mut fetch: F,
        is_finalized: P,
    ) -> Result<PollOutcome<T>, AdaptorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdaptorError>>,
        P: Fn(&T) -> bool,
    {
        let mut attempt = 1;
        loop {
            let observed = fetch().await?;
            if is_finalized(&observed) {
                return Ok(PollOutcome::Finalized(observed));
            }
            if attempt >= self.attempts {
                debug!("Not finalized after {} attempts, giving up", attempt);
                return Ok(PollOutcome::GivenUp(observed));
            }
            debug!(
                "Not finalized yet, attempt {}/{}; retrying in {:?}",
                attempt, self.attempts, self.interval
            );
            tokio::time::sleep(self.interval).await;
            attempt += 1;
        }
    }
}
