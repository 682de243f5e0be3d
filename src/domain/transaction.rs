use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the processor returns for an accepted submission.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
#[serde(transparent)]
pub struct TransactionHandle {
    id: String,
}

impl TransactionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Processor-side status of a transaction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransactionOutcome {
    Pending,
    Authorized,
    Rejected,
}

/// Lifecycle of the status poller for one transaction handle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    Authorized,
    Rejected,
    /// Torn down before an outcome arrived.
    Cancelled,
    /// Attempt ceiling reached without an outcome.
    TimedOut,
}

impl PollState {
    /// Authorized and Rejected are final; nothing leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Authorized | PollState::Rejected)
    }

    /// True once the poller has stopped for any reason.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PollState::Authorized | PollState::Rejected | PollState::Cancelled | PollState::TimedOut
        )
    }

    /// Applies one status response.
    pub fn on_outcome(self, outcome: TransactionOutcome) -> PollState {
        match (self, outcome) {
            (PollState::Polling, TransactionOutcome::Authorized) => PollState::Authorized,
            (PollState::Polling, TransactionOutcome::Rejected) => PollState::Rejected,
            (state, _) => state,
        }
    }

    /// Teardown only affects a poller that has not finished yet.
    pub fn cancel(self) -> PollState {
        if self.is_finished() {
            self
        } else {
            PollState::Cancelled
        }
    }
}
