//! Submission guard: time bounds and network-failure classification.
//!
//! Wraps a single remote call with a timeout and converts retryable
//! transport failures into a sentinel the check-in reducer understands.
//! Composition order in use is
//! `with_network_error_guard(recovery, with_timeout(bound, clock, call))`,
//! so an elapsed time bound is itself treated as a retryable network
//! condition.

use std::{future::Future, sync::Arc, time::Duration};

use checkpost_core::Clock;

use crate::error::{Result, SubmitError};

/// Outcome of a guarded remote call.
///
/// Either the underlying reply, or the synthetic sentinel produced when a
/// retryable network condition was caught and converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The remote call produced a well-formed reply.
    Replied(T),
    /// A retryable transport failure was suppressed.
    NetworkFailure,
}

impl<T> GuardOutcome<T> {
    /// Returns true when the sentinel was produced.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkFailure)
    }

    /// Extracts the reply, if one was produced.
    pub fn replied(self) -> Option<T> {
        match self {
            Self::Replied(value) => Some(value),
            Self::NetworkFailure => None,
        }
    }
}

/// Races `op` against a timer.
///
/// If the timer fires first the call is classified as
/// [`SubmitError::Timeout`]; otherwise the operation's own result or
/// failure is returned unchanged. The losing operation is NOT aborted: it
/// keeps running on its spawned task and its eventual result is discarded.
///
/// # Errors
///
/// Returns `SubmitError::Timeout` when the bound elapses first, or
/// whatever error the operation itself produced.
pub async fn with_timeout<T>(
    bound: Duration,
    clock: Arc<dyn Clock>,
    op: impl Future<Output = Result<T>> + Send + 'static,
) -> Result<T>
where
    T: Send + 'static,
{
    let mut attempt = tokio::spawn(op);

    tokio::select! {
        joined = &mut attempt => match joined {
            Ok(result) => result,
            Err(join_error) => {
                Err(SubmitError::internal(format!("submission task failed: {join_error}")))
            },
        },
        () = clock.sleep(bound) => Err(SubmitError::timeout(bound)),
    }
}

/// Awaits `op`, converting retryable transport failures into the sentinel.
///
/// When the operation fails with a timeout or network classification, the
/// failure is suppressed: `recovery` runs (the reducer uses it to emit the
/// user-facing warning) and [`GuardOutcome::NetworkFailure`] is returned.
/// Any other failure propagates unsuppressed.
///
/// # Errors
///
/// Returns the operation's own error whenever it is not a retryable
/// transport condition.
pub async fn with_network_error_guard<T, F>(
    recovery: F,
    op: impl Future<Output = Result<T>>,
) -> Result<GuardOutcome<T>>
where
    F: FnOnce(&SubmitError),
{
    match op.await {
        Ok(reply) => Ok(GuardOutcome::Replied(reply)),
        Err(error) if error.is_retryable_transport() => {
            recovery(&error);
            Ok(GuardOutcome::NetworkFailure)
        },
        Err(error) => Err(error),
    }
}
