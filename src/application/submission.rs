use crate::domain::draft::TransactionDraft;
use crate::domain::payment::{CardData, Cardholder, PaymentRequest};
use crate::domain::ports::GatewayRef;
use crate::domain::transaction::TransactionHandle;
use crate::domain::validation::parse_amount;
use crate::error::{FieldError, SubmissionError};
use tracing::{info, warn};

pub const UNTRACKED_MESSAGE: &str = "Transaction registered without a tracking code";

/// An accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub handle: TransactionHandle,
    /// Acknowledgement text from the processor, if it sent one.
    pub message: Option<String>,
}

/// Turns a validated draft into a processor request and sends it.
pub struct SubmissionClient {
    gateway: GatewayRef,
    cardholder: Cardholder,
}

impl SubmissionClient {
    /// Creates a new `SubmissionClient`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The processor that receives the payment.
    /// * `cardholder` - Name and address attached to every card blob.
    pub fn new(gateway: GatewayRef, cardholder: Cardholder) -> Self {
        Self {
            gateway,
            cardholder,
        }
    }

    /// Splits the draft into the sensitive card blob and the transaction metadata.
    pub fn compose(&self, draft: &TransactionDraft) -> Result<PaymentRequest, FieldError> {
        let amount = parse_amount(&draft.amount).ok_or(FieldError::InvalidAmount)?;
        Ok(PaymentRequest {
            amount,
            brand: draft.card_brand,
            card: CardData {
                card_number: draft.card_digits(),
                expiry_date: draft.expiry_display(),
                cvv: draft.cvv.clone(),
                holder_name: self.cardholder.name.clone(),
                holder_address: self.cardholder.address.clone(),
            },
            deferred: draft.deferred_payment,
            installments: draft.installments.filter(|_| draft.deferred_payment),
        })
    }

    /// One call to the processor. Only a returned identifier counts as success.
    pub async fn submit(&self, request: &PaymentRequest) -> Result<Submitted, SubmissionError> {
        let receipt = self.gateway.process(request).await.inspect_err(|e| {
            warn!(error = %e, "submission failed");
        })?;

        match receipt.transaction_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                info!(transaction = %id, "submission accepted");
                Ok(Submitted {
                    handle: TransactionHandle::new(id),
                    message: receipt.message,
                })
            }
            None => {
                warn!("processor accepted the submission without a transaction id");
                Err(SubmissionError::Untracked(
                    receipt
                        .message
                        .unwrap_or_else(|| UNTRACKED_MESSAGE.to_string()),
                ))
            }
        }
    }
}
