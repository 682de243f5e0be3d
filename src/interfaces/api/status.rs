use crate::domain::transaction::TransactionOutcome;
use serde::Deserialize;
use tracing::warn;

pub const AUTHORIZED: &str = "AUT";
pub const REJECTED: &str = "REC";
/// Sent, awaiting the network's answer.
pub const SENT: &str = "ENV";

/// Body of `GET /v1/transacciones/{id}/estado`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct StatusResponse {
    #[serde(default)]
    pub estado: Option<String>,
}

impl StatusResponse {
    /// Maps the processor's state code. Unknown codes count as pending.
    pub fn outcome(&self) -> TransactionOutcome {
        match self.estado.as_deref() {
            Some(AUTHORIZED) => TransactionOutcome::Authorized,
            Some(REJECTED) => TransactionOutcome::Rejected,
            Some(SENT) => TransactionOutcome::Pending,
            other => {
                warn!(code = ?other, "unrecognised transaction state code, still pending");
                TransactionOutcome::Pending
            }
        }
    }
}

pub fn status_path(transaction_id: &str) -> String {
    format!(
        "/v1/transacciones/{}/estado",
        urlencoding::encode(transaction_id)
    )
}
