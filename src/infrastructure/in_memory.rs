use crate::domain::payment::{PaymentRequest, ProcessingReceipt};
use crate::domain::ports::TransactionGateway;
use crate::domain::transaction::{TransactionHandle, TransactionOutcome};
use crate::error::{PollError, SubmissionError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Script {
    receipts: VecDeque<Result<ProcessingReceipt, SubmissionError>>,
    statuses: VecDeque<Result<TransactionOutcome, PollError>>,
    submissions: Vec<PaymentRequest>,
    status_queries: Vec<TransactionHandle>,
}

/// An in-process stand-in for the remote processor.
///
/// Answers submissions and status queries from scripted queues and records
/// every call. Once the status queue runs dry every query reports `Pending`;
/// an empty receipt queue fails submissions with a transport error.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    script: Arc<RwLock<Script>>,
}

impl ScriptedGateway {
    pub fn new(
        receipts: impl IntoIterator<Item = Result<ProcessingReceipt, SubmissionError>>,
        statuses: impl IntoIterator<Item = Result<TransactionOutcome, PollError>>,
    ) -> Self {
        let script = Script {
            receipts: receipts.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            ..Script::default()
        };
        Self {
            script: Arc::new(RwLock::new(script)),
        }
    }

    /// A processor that accepts one submission under `id` and then reports `statuses`.
    pub fn accepting(
        id: &str,
        statuses: impl IntoIterator<Item = Result<TransactionOutcome, PollError>>,
    ) -> Self {
        let receipt = ProcessingReceipt {
            transaction_id: Some(id.to_string()),
            message: None,
        };
        Self::new([Ok(receipt)], statuses)
    }

    pub async fn push_receipt(&self, receipt: Result<ProcessingReceipt, SubmissionError>) {
        self.script.write().await.receipts.push_back(receipt);
    }

    pub async fn push_status(&self, status: Result<TransactionOutcome, PollError>) {
        self.script.write().await.statuses.push_back(status);
    }

    pub async fn submissions(&self) -> Vec<PaymentRequest> {
        self.script.read().await.submissions.clone()
    }

    pub async fn status_queries(&self) -> usize {
        self.script.read().await.status_queries.len()
    }

    /// Handles in the order they were queried.
    pub async fn queried_handles(&self) -> Vec<TransactionHandle> {
        self.script.read().await.status_queries.clone()
    }
}

#[async_trait]
impl TransactionGateway for ScriptedGateway {
    async fn process(&self, request: &PaymentRequest) -> Result<ProcessingReceipt, SubmissionError> {
        let mut script = self.script.write().await;
        script.submissions.push(request.clone());
        script.receipts.pop_front().unwrap_or_else(|| {
            Err(SubmissionError::Transport(
                "no scripted response".to_string(),
            ))
        })
    }

    async fn status(&self, handle: &TransactionHandle) -> Result<TransactionOutcome, PollError> {
        let mut script = self.script.write().await;
        script.status_queries.push(handle.clone());
        script
            .statuses
            .pop_front()
            .unwrap_or(Ok(TransactionOutcome::Pending))
    }
}
