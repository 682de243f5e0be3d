use crate::domain::transaction::{PollState, TransactionHandle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// The transaction currently being tracked, with what it takes to stop it.
pub struct ActiveTransaction {
    handle: TransactionHandle,
    cancel: CancellationToken,
    task: Option<JoinHandle<PollState>>,
}

impl ActiveTransaction {
    pub fn handle(&self) -> &TransactionHandle {
        &self.handle
    }

    /// Cancels the poller and waits for its task to wind down.
    ///
    /// A poller that panicked leaves nothing to report, so the slot goes back to `Idle`.
    pub async fn stop(self) -> PollState {
        self.cancel.cancel();
        let Some(task) = self.task else {
            return PollState::Cancelled;
        };
        match task.await {
            Ok(state) => state,
            Err(e) if e.is_panic() => {
                warn!(transaction = %self.handle, error = %e, "status poller panicked");
                PollState::Idle
            }
            Err(_) => PollState::Cancelled,
        }
    }
}

/// Single-slot registry: at most one transaction is tracked at a time.
#[derive(Default)]
pub struct TransactionSlot {
    active: Option<ActiveTransaction>,
    state: PollState,
}

impl TransactionSlot {
    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn set_state(&mut self, state: PollState) {
        self.state = state;
    }

    pub fn handle(&self) -> Option<&TransactionHandle> {
        self.active.as_ref().map(|a| &a.handle)
    }

    pub fn is_occupied(&self) -> bool {
        self.active.is_some()
    }

    /// Starts tracking `handle`. Returns whatever was tracked before so the
    /// caller can stop it.
    pub fn occupy(
        &mut self,
        handle: TransactionHandle,
        cancel: CancellationToken,
        task: JoinHandle<PollState>,
    ) -> Option<ActiveTransaction> {
        self.state = PollState::Polling;
        self.active.replace(ActiveTransaction {
            handle,
            cancel,
            task: Some(task),
        })
    }

    pub fn take(&mut self) -> Option<ActiveTransaction> {
        self.active.take()
    }

    /// Hands out the poller task so it can be awaited without holding the slot.
    pub fn take_task(&mut self) -> Option<JoinHandle<PollState>> {
        self.active.as_mut().and_then(|a| a.task.take())
    }

    /// Records the final state of `handle` if it is still the tracked one.
    pub fn record(&mut self, handle: &TransactionHandle, state: PollState) -> bool {
        if self.handle() == Some(handle) {
            self.state = state;
            true
        } else {
            false
        }
    }

    /// Forgets `handle` if it is still the tracked one.
    pub fn release(&mut self, handle: &TransactionHandle) -> bool {
        if self.handle() == Some(handle) {
            self.active = None;
            self.state = PollState::Idle;
            true
        } else {
            false
        }
    }
}
