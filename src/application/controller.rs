use super::notifier::NotificationEmitter;
use super::poller::{StatusPoller, TIMED_OUT_MESSAGE};
use super::slot::TransactionSlot;
use super::submission::{SubmissionClient, Submitted};
use crate::config::{PollingSettings, Settings};
use crate::domain::draft::{CardBrand, Field, Installments, TransactionDraft};
use crate::domain::format::{format_card_number, format_cvv, format_expiry, split_expiry};
use crate::domain::notification::{NotificationEvent, Severity};
use crate::domain::ports::{ClockRef, GatewayRef};
use crate::domain::transaction::{PollState, TransactionHandle};
use crate::domain::validation::{ValidationErrors, validate_draft, validate_expiry};
use crate::error::{FieldError, SubmissionError, SubmitError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

pub const PROCESSING_MESSAGE: &str = "Transaction registered, processing payment...";

/// What the user sees: the draft and its inline errors.
#[derive(Debug, Default)]
struct FormState {
    draft: TransactionDraft,
    errors: ValidationErrors,
}

impl FormState {
    fn reset(&mut self) {
        self.draft.reset();
        self.errors.clear();
    }
}

/// Owns one card form and the lifecycle of the transaction submitted from it.
///
/// Input handlers format and check fields as they are typed, `submit` runs
/// the full validation pass and hands the draft to the processor, and an
/// accepted submission is tracked by a background poller until it resolves.
/// Dropping the controller (or calling `shutdown`) cancels every timer it
/// started.
pub struct TransactionController {
    gateway: GatewayRef,
    clock: ClockRef,
    submission: SubmissionClient,
    notifier: NotificationEmitter,
    polling: PollingSettings,
    form: Arc<Mutex<FormState>>,
    slot: Arc<Mutex<TransactionSlot>>,
    cancel: CancellationToken,
    _teardown: DropGuard,
}

impl TransactionController {
    /// Creates a controller with a blank form and nothing tracked.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The remote processor used for submissions and status queries.
    /// * `clock` - Source of today's date for expiry checks.
    /// * `settings` - Polling cadence, notification lifetime and cardholder details.
    pub fn new(gateway: GatewayRef, clock: ClockRef, settings: &Settings) -> Self {
        let cancel = CancellationToken::new();
        let notifier = NotificationEmitter::new(
            settings.notification.display_duration(),
            cancel.child_token(),
        );
        Self {
            submission: SubmissionClient::new(Arc::clone(&gateway), settings.cardholder.clone()),
            gateway,
            clock,
            notifier,
            polling: settings.polling.clone(),
            form: Arc::new(Mutex::new(FormState::default())),
            slot: Arc::new(Mutex::new(TransactionSlot::default())),
            _teardown: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Receiver for every notification shown from now on. Only the first call gets it.
    pub fn notifications(&self) -> Option<UnboundedReceiver<NotificationEvent>> {
        self.notifier.take_event_receiver()
    }

    /// Handles one edit of a text field.
    pub async fn input(&self, field: Field, raw: &str) {
        let today = self.clock.today();
        let mut form = self.form.lock().await;
        form.errors.remove(field);

        match field {
            Field::CardNumber => form.draft.card_number = format_card_number(raw),
            Field::Cvv => {
                let cvv = format_cvv(&form.draft.cvv, raw);
                form.draft.cvv = cvv;
            }
            Field::Amount => form.draft.amount = raw.to_string(),
            Field::Installments => form.draft.installments = raw.parse::<Installments>().ok(),
            Field::Expiry => {
                let display = format_expiry(raw);
                let (mm, yy) = split_expiry(&display);
                // only a complete MM/YY is checked while typing
                if yy.len() == 2
                    && let Err(e) = validate_expiry(&mm, &yy, today)
                {
                    form.errors.insert(Field::Expiry, FieldError::Expiry(e));
                }
                form.draft.expiry_month = mm;
                form.draft.expiry_year = yy;
            }
        }
    }

    pub async fn select_brand(&self, brand: CardBrand) {
        self.form.lock().await.draft.card_brand = brand;
    }

    pub async fn set_deferred(&self, deferred: bool) {
        let mut form = self.form.lock().await;
        form.draft.set_deferred(deferred);
        form.errors.remove(Field::Installments);
    }

    pub async fn select_installments(&self, installments: Option<Installments>) {
        let mut form = self.form.lock().await;
        form.draft.installments = installments;
        form.errors.remove(Field::Installments);
    }

    /// Validates the draft and submits it.
    ///
    /// Validation failures leave the draft untouched and never reach the
    /// network. Once the processor has been called the form is cleared,
    /// whatever it answered. An accepted submission replaces any transaction
    /// that was still being tracked.
    pub async fn submit(&self) -> Result<TransactionHandle, SubmitError> {
        let previous = self.slot.lock().await.take();
        if let Some(previous) = previous {
            warn!(transaction = %previous.handle(), "new submission replaces the tracked transaction");
            let state = previous.stop().await;
            self.slot.lock().await.set_state(state);
        }

        let today = self.clock.today();
        let request = {
            let mut form = self.form.lock().await;
            let errors = validate_draft(&form.draft, today);
            if !errors.is_empty() {
                debug!(%errors, "submission blocked by validation");
                form.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
            form.errors.clear();
            match self.submission.compose(&form.draft) {
                Ok(request) => request,
                Err(e) => {
                    let mut errors = ValidationErrors::new();
                    errors.insert(Field::Amount, e);
                    form.errors = errors.clone();
                    return Err(SubmitError::Invalid(errors));
                }
            }
        };

        let result = self.submission.submit(&request).await;
        self.form.lock().await.reset();

        match result {
            Ok(Submitted { handle, message }) => {
                self.start_polling(handle.clone()).await;
                let message = message.unwrap_or_else(|| PROCESSING_MESSAGE.to_string());
                self.notifier.show(message, Severity::Warning).await;
                Ok(handle)
            }
            Err(e) => {
                let severity = match e {
                    SubmissionError::Untracked(_) => Severity::Warning,
                    SubmissionError::Rejected(_) | SubmissionError::Transport(_) => Severity::Error,
                };
                self.notifier.show(e.to_string(), severity).await;
                Err(e.into())
            }
        }
    }

    async fn start_polling(&self, handle: TransactionHandle) {
        let poll_cancel = self.cancel.child_token();
        let poller = StatusPoller::new(
            Arc::clone(&self.gateway),
            self.notifier.clone(),
            &self.polling,
        );
        let form = Arc::clone(&self.form);
        let slot = Arc::clone(&self.slot);
        let notifier = self.notifier.clone();
        let reset_delay = self.polling.reset_delay();
        let task_handle = handle.clone();
        let task_cancel = poll_cancel.clone();

        // hold the slot while spawning so the task cannot report before it is registered
        let mut guard = self.slot.lock().await;
        let task = tokio::spawn(async move {
            let handle = task_handle;
            let state = poller.run(handle.clone(), task_cancel.clone()).await;
            slot.lock().await.record(&handle, state);

            if state.is_terminal() || state == PollState::TimedOut {
                tokio::select! {
                    _ = task_cancel.cancelled() => {}
                    _ = tokio::time::sleep(reset_delay) => {
                        info!(transaction = %handle, ?state, "resetting view");
                        form.lock().await.reset();
                        notifier.clear().await;
                        slot.lock().await.release(&handle);
                    }
                }
            }
            state
        });
        let stale = guard.occupy(handle, poll_cancel, task);
        drop(guard);
        if let Some(stale) = stale {
            stale.stop().await;
        }
    }

    /// Stops tracking the active transaction without notifying the user.
    pub async fn cancel_active(&self) -> Option<PollState> {
        let active = self.slot.lock().await.take()?;
        info!(transaction = %active.handle(), "cancelling tracked transaction");
        let state = active.stop().await;
        self.slot.lock().await.set_state(state);
        Some(state)
    }

    /// Waits until the tracked transaction is resolved and the view has been reset.
    ///
    /// If the poller dies the slot is released and the user is told the
    /// outcome is unknown; the returned state is then `Idle`.
    pub async fn await_outcome(&self) -> Option<PollState> {
        let (handle, task) = {
            let mut slot = self.slot.lock().await;
            let handle = slot.handle().cloned()?;
            (handle, slot.take_task()?)
        };

        match task.await {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(transaction = %handle, error = %e, "status poller ended abnormally");
                self.slot.lock().await.release(&handle);
                self.notifier.show(TIMED_OUT_MESSAGE, Severity::Warning).await;
                Some(PollState::Idle)
            }
        }
    }

    /// Tears everything down: poller, pending reset and notification timers.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let active = self.slot.lock().await.take();
        if let Some(active) = active {
            let state = active.stop().await;
            self.slot.lock().await.set_state(state);
        }
        self.notifier.shutdown().await;
    }

    pub async fn draft(&self) -> TransactionDraft {
        self.form.lock().await.draft.clone()
    }

    pub async fn errors(&self) -> ValidationErrors {
        self.form.lock().await.errors.clone()
    }

    pub async fn notification(&self) -> Option<NotificationEvent> {
        self.notifier.current().await
    }

    pub async fn poll_state(&self) -> PollState {
        self.slot.lock().await.state()
    }

    pub async fn active_handle(&self) -> Option<TransactionHandle> {
        self.slot.lock().await.handle().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewaySettings, NotificationSettings};
    use crate::domain::payment::{Cardholder, PaymentRequest, ProcessingReceipt};
    use crate::domain::ports::TransactionGateway;
    use crate::domain::transaction::TransactionOutcome;
    use crate::error::{ExpiryError, PollError};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::in_memory::ScriptedGateway;
    use chrono::NaiveDate;

    fn settings() -> Settings {
        Settings {
            gateway: GatewaySettings {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_ms: 1000,
            },
            polling: PollingSettings::default(),
            notification: NotificationSettings::default(),
            cardholder: Cardholder {
                name: "JUAN PEREZ".to_string(),
                address: "Av. Principal 123".to_string(),
            },
        }
    }

    fn controller(gateway: &ScriptedGateway) -> TransactionController {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        TransactionController::new(
            Arc::new(gateway.clone()),
            Arc::new(FixedClock(today)),
            &settings(),
        )
    }

    #[tokio::test]
    async fn test_input_formats_fields() {
        let controller = controller(&ScriptedGateway::default());
        controller.input(Field::CardNumber, "4111111111111111999").await;
        controller.input(Field::Expiry, "1299").await;
        controller.input(Field::Cvv, "12").await;
        controller.input(Field::Cvv, "1234").await;

        let draft = controller.draft().await;
        assert_eq!(draft.card_number, "4111 1111 1111 1111");
        assert_eq!(draft.expiry_display(), "12/99");
        assert_eq!(draft.cvv, "12");
    }

    #[tokio::test]
    async fn test_complete_expiry_is_checked_while_typing() {
        let controller = controller(&ScriptedGateway::default());

        controller.input(Field::Expiry, "0926").await;
        assert_eq!(
            controller.errors().await.get(Field::Expiry),
            Some(FieldError::Expiry(ExpiryError::Expired))
        );

        // partial input skips the check
        controller.input(Field::Expiry, "13").await;
        assert!(controller.errors().await.is_empty());
        assert_eq!(controller.draft().await.expiry_display(), "13");

        controller.input(Field::Expiry, "1330").await;
        assert_eq!(
            controller.errors().await.get(Field::Expiry),
            Some(FieldError::Expiry(ExpiryError::OutOfRange))
        );

        controller.input(Field::Expiry, "1026").await;
        assert!(controller.errors().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_submit_keeps_draft_and_skips_network() {
        let gateway = ScriptedGateway::default();
        let controller = controller(&gateway);
        controller.input(Field::CardNumber, "4111").await;

        let err = controller.submit().await.unwrap_err();
        let SubmitError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert!(errors.contains(Field::CardNumber));
        assert_eq!(controller.errors().await, errors);
        assert_eq!(controller.draft().await.card_number, "4111");
        assert!(gateway.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_editing_clears_inline_error() {
        let controller = controller(&ScriptedGateway::default());
        let _ = controller.submit().await;
        assert!(controller.errors().await.contains(Field::Cvv));

        controller.input(Field::Cvv, "1").await;
        assert!(!controller.errors().await.contains(Field::Cvv));
        assert!(controller.errors().await.contains(Field::CardNumber));
    }

    #[tokio::test]
    async fn test_turning_deferred_off_clears_installments() {
        let controller = controller(&ScriptedGateway::default());
        controller.set_deferred(true).await;
        controller.input(Field::Installments, "12").await;
        assert_eq!(
            controller.draft().await.installments,
            Some(Installments::Twelve)
        );

        controller.set_deferred(false).await;
        assert_eq!(controller.draft().await.installments, None);
    }

    /// Accepts every submission, then blows up on the first status query.
    struct PanickingGateway;

    #[async_trait::async_trait]
    impl TransactionGateway for PanickingGateway {
        async fn process(
            &self,
            _request: &PaymentRequest,
        ) -> Result<ProcessingReceipt, SubmissionError> {
            Ok(ProcessingReceipt {
                transaction_id: Some("TRX-1".to_string()),
                message: None,
            })
        }

        async fn status(
            &self,
            _handle: &TransactionHandle,
        ) -> Result<TransactionOutcome, PollError> {
            panic!("status decoding failed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_poller_releases_the_slot() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let controller = TransactionController::new(
            Arc::new(PanickingGateway),
            Arc::new(FixedClock(today)),
            &settings(),
        );
        controller.input(Field::CardNumber, "4111111111111111").await;
        controller.input(Field::Expiry, "1299").await;
        controller.input(Field::Cvv, "123").await;
        controller.input(Field::Amount, "10").await;
        controller.submit().await.unwrap();

        assert_eq!(controller.await_outcome().await, Some(PollState::Idle));

        assert_eq!(controller.poll_state().await, PollState::Idle);
        assert_eq!(controller.active_handle().await, None);
        let shown = controller.notification().await.unwrap();
        assert_eq!(shown.severity, Severity::Warning);
        assert_eq!(shown.message, TIMED_OUT_MESSAGE);
    }
}
