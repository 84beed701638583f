//! Check-in reducer: folds the pending list through the submission guard.
//!
//! The engine pulls the full pending list, attempts each record in order
//! through the guarded pipeline, reports every outcome through the
//! notification capability, and rewrites the queue with the records that
//! must survive for a later pass.
//!
//! Which records survive is a pure decision over the per-record outcomes,
//! kept separate from the side-effecting notification step: only records
//! whose submission died in transport are retained. A well-formed service
//! reply — success or rejection — always drops its record from the queue;
//! rejections are reported to the user but never retried.

use std::{sync::Arc, time::Duration};

use checkpost_core::{fp, models::ServiceReply, Clock, Record};
use tracing::{info, warn};

use crate::{
    client::RecordingClient,
    error::Result,
    guard::{with_network_error_guard, with_timeout, GuardOutcome},
    queue::PendingQueue,
    report::{network_failure_notice, reply_notice, Notifier},
    DEFAULT_SUBMIT_TIMEOUT,
};

/// Tuning for the check-in engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time bound on each individual remote submission.
    pub submit_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { submit_timeout: DEFAULT_SUBMIT_TIMEOUT }
    }
}

/// Result of one record's trip through the guarded pipeline.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// The record that was attempted.
    pub record: Record,
    /// Whether the record reached the service layer. Rejections count as
    /// delivered; only transport failures do not.
    pub delivered: bool,
}

/// Rebuilds the pending list from a pass's outcomes.
///
/// Pure survival policy: undelivered records survive, in their original
/// relative order, in a single fused accumulation pass.
pub fn surviving_records(outcomes: Vec<RecordOutcome>) -> Vec<Record> {
    fp::transduce(
        |combine| {
            fp::transduce_filter(
                |outcome: &RecordOutcome| !outcome.delivered,
                fp::transduce_map(|outcome: RecordOutcome| outcome.record, combine),
            )
        },
        fp::list_combine,
        Vec::new(),
        outcomes,
    )
}

/// Drives check-in passes over the durable queue.
pub struct CheckInEngine {
    client: Arc<RecordingClient>,
    queue: PendingQueue,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl CheckInEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        client: Arc<RecordingClient>,
        queue: PendingQueue,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self { client, queue, notifier, clock, config }
    }

    /// Enqueues a new record ahead of the backlog and runs a pass.
    ///
    /// The new record is logically prepended, the whole list is attempted,
    /// and the queue is rewritten with whatever survived. Returns the
    /// number of records retained for a later pass.
    ///
    /// # Errors
    ///
    /// Returns queue storage failures and any non-transport submission
    /// failure; transport failures are absorbed into retention.
    pub async fn check_in_and_save(&mut self, new_record: Record) -> Result<usize> {
        let mut pending = vec![new_record];
        pending.extend_from_slice(self.queue.get().await?);
        self.run_over(pending).await
    }

    /// Runs a pass over the backlog alone.
    ///
    /// This is the explicit retry entry point: records retained by earlier
    /// passes get another attempt. Returns the number still retained.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::check_in_and_save`].
    pub async fn run_pass(&mut self) -> Result<usize> {
        let pending = self.queue.get().await?.to_vec();
        if pending.is_empty() {
            return Ok(0);
        }
        self.run_over(pending).await
    }

    /// Submits a removal directly, bypassing the durable queue.
    ///
    /// Checkout is an interactive correction; it is not queued for retry.
    /// The outcome is still reported through the notifier.
    ///
    /// # Errors
    ///
    /// Returns transport and reply failures unabsorbed — there is no queue
    /// to retain a checkout in.
    pub async fn submit_uncheck(&self, name: &str) -> Result<ServiceReply> {
        let record = Record::uncheck(name);
        let client = Arc::clone(&self.client);
        let reply = with_timeout(self.config.submit_timeout, Arc::clone(&self.clock), async move {
            client.submit(&record).await
        })
        .await?;

        self.notifier.notify(reply_notice(&reply));
        Ok(reply)
    }

    /// Returns the current pending backlog.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Storage` if the initial queue load fails.
    pub async fn pending(&mut self) -> Result<Vec<Record>> {
        Ok(self.queue.get().await?.to_vec())
    }

    /// Folds `pending` through the guarded pipeline and rewrites the queue.
    async fn run_over(&mut self, pending: Vec<Record>) -> Result<usize> {
        let total = pending.len();
        let mut outcomes = Vec::with_capacity(total);

        // Strictly sequential: each record's submission and notification
        // complete before the next begins.
        for record in pending {
            let outcome = self.submit_one(record).await?;
            outcomes.push(outcome);
        }

        let survivors = fp::trace("surviving_records", surviving_records)(outcomes);
        let retained = survivors.len();
        self.queue.set(survivors).await?;

        info!(total, retained, "check-in pass complete");
        Ok(retained)
    }

    /// Sends one record through guard(timeout(submit)) and reports it.
    async fn submit_one(&self, record: Record) -> Result<RecordOutcome> {
        let client = Arc::clone(&self.client);
        let to_send = record.clone();
        let attempt = with_timeout(
            self.config.submit_timeout,
            Arc::clone(&self.clock),
            async move { client.submit(&to_send).await },
        );

        let guarded = with_network_error_guard(
            |error| {
                warn!(name = %record.name, error = %error, "transport failure, record retained");
                self.notifier.notify(network_failure_notice());
            },
            attempt,
        )
        .await?;

        match guarded {
            GuardOutcome::Replied(reply) => {
                self.notifier.notify(reply_notice(&reply));
                Ok(RecordOutcome { record, delivered: true })
            },
            GuardOutcome::NetworkFailure => Ok(RecordOutcome { record, delivered: false }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, delivered: bool) -> RecordOutcome {
        RecordOutcome { record: Record::new(name), delivered }
    }

    #[test]
    fn delivered_records_are_dropped() {
        let survivors = surviving_records(vec![outcome("ada", true)]);
        assert!(survivors.is_empty());
    }

    #[test]
    fn undelivered_records_survive_in_order() {
        let survivors = surviving_records(vec![
            outcome("ada", false),
            outcome("grace", true),
            outcome("edsger", false),
            outcome("barbara", false),
        ]);

        let names: Vec<_> = survivors.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ada", "edsger", "barbara"]);
    }

    #[test]
    fn empty_pass_survives_nothing() {
        assert!(surviving_records(Vec::new()).is_empty());
    }
}
