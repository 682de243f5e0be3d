use crate::domain::draft::CardBrand;
use crate::domain::payment::{PaymentRequest, ProcessingReceipt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const PROCESS_PATH: &str = "/v1/procesamiento-transaccion/procesar";
pub const DEFAULT_REJECTION_MESSAGE: &str = "Error processing the transaction in the backend";

/// Body of `POST /v1/procesamiento-transaccion/procesar`.
///
/// Card data is embedded as a JSON-encoded string so the metadata can be
/// inspected without touching the sensitive fields.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub marca: CardBrand,
    pub datos_tarjeta: String,
    pub interes_diferido: bool,
    pub cuotas: Option<u8>,
}

impl TryFrom<&PaymentRequest> for ProcessPayload {
    type Error = serde_json::Error;

    fn try_from(request: &PaymentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            monto: request.amount,
            marca: request.brand,
            datos_tarjeta: serde_json::to_string(&request.card)?,
            interes_diferido: request.deferred,
            cuotas: request
                .installments
                .filter(|_| request.deferred)
                .map(|i| i.count()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    #[serde(default)]
    pub codigo_unico_transaccion: Option<String>,
    #[serde(default)]
    pub mensaje: Option<String>,
}

impl From<ProcessResponse> for ProcessingReceipt {
    fn from(response: ProcessResponse) -> Self {
        Self {
            transaction_id: response.codigo_unico_transaccion,
            message: response.mensaje,
        }
    }
}
