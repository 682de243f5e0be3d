use super::notifier::NotificationEmitter;
use crate::config::PollingSettings;
use crate::domain::notification::Severity;
use crate::domain::ports::GatewayRef;
use crate::domain::transaction::{PollState, TransactionHandle, TransactionOutcome};
use crate::error::PollError;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const AUTHORIZED_MESSAGE: &str = "Transaction authorized";
pub const REJECTED_MESSAGE: &str = "Transaction rejected";
pub const TIMED_OUT_MESSAGE: &str = "Transaction status unknown, please verify with the processor";

/// Polls the processor for one transaction until it is resolved.
///
/// The first query goes out one interval after `run` starts. Failed queries
/// are logged and retried on the next tick; only a terminal status, the
/// attempt ceiling or cancellation stop the loop.
pub struct StatusPoller {
    gateway: GatewayRef,
    notifier: NotificationEmitter,
    interval: Duration,
    max_attempts: Option<u32>,
    state: PollState,
    attempts: u32,
}

impl StatusPoller {
    /// Creates an idle poller.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The processor to query.
    /// * `notifier` - Where the terminal outcome is announced.
    /// * `settings` - Interval between queries and the attempt ceiling.
    pub fn new(gateway: GatewayRef, notifier: NotificationEmitter, settings: &PollingSettings) -> Self {
        Self {
            gateway,
            notifier,
            interval: settings.interval(),
            max_attempts: settings.attempt_limit(),
            state: PollState::Idle,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Drives the state machine to completion and returns the final state.
    ///
    /// # Arguments
    ///
    /// * `handle` - The transaction to track.
    /// * `cancel` - Stops the loop, even mid-query; the result is then `Cancelled`.
    pub async fn run(mut self, handle: TransactionHandle, cancel: CancellationToken) -> PollState {
        self.state = PollState::Polling;
        info!(transaction = %handle, "polling transaction status");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                response = self.gateway.status(&handle) => response,
            };

            self.apply(&handle, response).await;
            if self.state.is_finished() {
                return self.state;
            }
        }

        self.state = self.state.cancel();
        info!(transaction = %handle, attempts = self.attempts, "polling cancelled");
        self.state
    }

    /// Feeds one status response into the state machine.
    pub async fn apply(
        &mut self,
        handle: &TransactionHandle,
        response: Result<TransactionOutcome, PollError>,
    ) -> PollState {
        if self.state.is_finished() {
            return self.state;
        }
        self.attempts += 1;
        match response {
            Ok(outcome) => {
                debug!(transaction = %handle, attempt = self.attempts, ?outcome, "status received");
                self.state = self.state.on_outcome(outcome);
            }
            Err(e) => {
                warn!(transaction = %handle, attempt = self.attempts, error = %e, "status query failed, retrying");
            }
        }

        match self.state {
            PollState::Authorized => {
                info!(transaction = %handle, "transaction authorized");
                self.notifier.show(AUTHORIZED_MESSAGE, Severity::Success).await;
            }
            PollState::Rejected => {
                info!(transaction = %handle, "transaction rejected");
                self.notifier.show(REJECTED_MESSAGE, Severity::Error).await;
            }
            PollState::Polling => {
                if let Some(limit) = self.max_attempts
                    && self.attempts >= limit
                {
                    warn!(transaction = %handle, attempts = self.attempts, "no outcome before the attempt limit");
                    self.state = PollState::TimedOut;
                    self.notifier.show(TIMED_OUT_MESSAGE, Severity::Warning).await;
                }
            }
            _ => {}
        }
        self.state
    }
}
