use super::payment::{PaymentRequest, ProcessingReceipt};
use super::transaction::{TransactionHandle, TransactionOutcome};
use crate::error::{PollError, SubmissionError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// The remote transaction processor.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    async fn process(&self, request: &PaymentRequest) -> Result<ProcessingReceipt, SubmissionError>;
    async fn status(&self, handle: &TransactionHandle) -> Result<TransactionOutcome, PollError>;
}

pub type GatewayRef = Arc<dyn TransactionGateway>;

/// Source of "today" for expiry checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub type ClockRef = Arc<dyn Clock>;
