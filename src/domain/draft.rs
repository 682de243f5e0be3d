use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card networks accepted by the processor, serialized with its four-letter codes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum CardBrand {
    #[default]
    #[serde(rename = "MSCD")]
    Mastercard,
    #[serde(rename = "VISA")]
    Visa,
    #[serde(rename = "AMEX")]
    Amex,
    #[serde(rename = "DINE")]
    Diners,
}

impl CardBrand {
    pub fn code(&self) -> &'static str {
        match self {
            CardBrand::Mastercard => "MSCD",
            CardBrand::Visa => "VISA",
            CardBrand::Amex => "AMEX",
            CardBrand::Diners => "DINE",
        }
    }
}

impl FromStr for CardBrand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MSCD" | "MASTERCARD" => Ok(CardBrand::Mastercard),
            "VISA" => Ok(CardBrand::Visa),
            "AMEX" | "AMERICAN EXPRESS" => Ok(CardBrand::Amex),
            "DINE" | "DINERS" | "DINERS CLUB" => Ok(CardBrand::Diners),
            other => Err(format!("unknown card brand '{other}'")),
        }
    }
}

/// Installment plans offered for deferred payments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Installments {
    Three,
    Six,
    Nine,
    Twelve,
}

impl Installments {
    pub fn count(&self) -> u8 {
        match self {
            Installments::Three => 3,
            Installments::Six => 6,
            Installments::Nine => 9,
            Installments::Twelve => 12,
        }
    }
}

impl FromStr for Installments {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3" => Ok(Installments::Three),
            "6" => Ok(Installments::Six),
            "9" => Ok(Installments::Nine),
            "12" => Ok(Installments::Twelve),
            other => Err(format!("installments must be 3, 6, 9 or 12, got '{other}'")),
        }
    }
}

/// Form fields that carry free-text input and can hold an inline error.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Field {
    CardNumber,
    Expiry,
    Cvv,
    Amount,
    Installments,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::CardNumber => "cardNumber",
            Field::Expiry => "expiryDate",
            Field::Cvv => "cvv",
            Field::Amount => "amount",
            Field::Installments => "cuotas",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The card form as the user is filling it in.
///
/// Values are kept in display form (the card number grouped by four digits,
/// expiry split into month and year) exactly as the formatter produced them.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TransactionDraft {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub card_brand: CardBrand,
    pub amount: String,
    pub deferred_payment: bool,
    pub installments: Option<Installments>,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card number without display separators.
    pub fn card_digits(&self) -> String {
        self.card_number.chars().filter(char::is_ascii_digit).collect()
    }

    /// Expiry as shown in the form: `MM`, `MM/Y` or `MM/YY`.
    pub fn expiry_display(&self) -> String {
        if self.expiry_year.is_empty() {
            self.expiry_month.clone()
        } else {
            format!("{}/{}", self.expiry_month, self.expiry_year)
        }
    }

    /// Toggles the deferred plan; leaving it drops any selected installments.
    pub fn set_deferred(&mut self, deferred: bool) {
        self.deferred_payment = deferred;
        if !deferred {
            self.installments = None;
        }
    }

    /// Back to a blank form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&CardBrand::Diners).unwrap();
        assert_eq!(json, "\"DINE\"");
        let brand: CardBrand = serde_json::from_str("\"MSCD\"").unwrap();
        assert_eq!(brand, CardBrand::Mastercard);
    }

    #[test]
    fn test_brand_parsing_accepts_names_and_codes() {
        assert_eq!("visa".parse::<CardBrand>(), Ok(CardBrand::Visa));
        assert_eq!("Diners Club".parse::<CardBrand>(), Ok(CardBrand::Diners));
        assert!("DISCOVER".parse::<CardBrand>().is_err());
    }

    #[test]
    fn test_installments_parsing() {
        assert_eq!("12".parse::<Installments>(), Ok(Installments::Twelve));
        assert!("4".parse::<Installments>().is_err());
        assert!("".parse::<Installments>().is_err());
    }

    #[test]
    fn test_disabling_deferred_clears_installments() {
        let mut draft = TransactionDraft::new();
        draft.set_deferred(true);
        draft.installments = Some(Installments::Six);

        draft.set_deferred(false);
        assert!(!draft.deferred_payment);
        assert_eq!(draft.installments, None);
    }

    #[test]
    fn test_reset_restores_blank_form() {
        let mut draft = TransactionDraft {
            card_number: "4111 1111".to_string(),
            card_brand: CardBrand::Amex,
            amount: "10".to_string(),
            ..TransactionDraft::default()
        };
        draft.reset();
        assert_eq!(draft, TransactionDraft::new());
        assert_eq!(draft.card_brand, CardBrand::Mastercard);
    }
}
