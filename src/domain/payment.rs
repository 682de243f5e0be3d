use super::draft::{CardBrand, Installments};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Card holder details sent alongside the card data.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Cardholder {
    pub name: String,
    pub address: String,
}

/// The sensitive part of a payment. Travels as one opaque blob.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct CardData {
    #[serde(rename = "cardNumber")]
    pub card_number: String,
    #[serde(rename = "expiryDate")]
    pub expiry_date: String,
    pub cvv: String,
    #[serde(rename = "nombreTarjeta")]
    pub holder_name: String,
    #[serde(rename = "direccionTarjeta")]
    pub holder_address: String,
}

/// A validated payment ready for the processor.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub brand: CardBrand,
    pub card: CardData,
    pub deferred: bool,
    pub installments: Option<Installments>,
}

/// What the processor answered to an accepted submission.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ProcessingReceipt {
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}
