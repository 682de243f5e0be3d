use super::draft::{Field, Installments, TransactionDraft};
use crate::error::{ExpiryError, FieldError};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Inline errors keyed by field. An empty map means the draft can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Human-readable message for a field, if it has an error.
    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(|e| e.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }

    fn record(&mut self, field: Field, check: Result<(), FieldError>) {
        if let Err(e) = check {
            self.insert(field, e);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

/// Separators are ignored; exactly sixteen digits must remain.
pub fn validate_card_number(raw: &str) -> Result<(), FieldError> {
    let count = raw.chars().filter(char::is_ascii_digit).count();
    if count == 16 {
        Ok(())
    } else {
        Err(FieldError::CardNumberLength)
    }
}

/// A card stays valid through its expiry month.
pub fn validate_expiry(mm: &str, yy: &str, today: NaiveDate) -> Result<(), ExpiryError> {
    if !is_digits(mm, 2) || !is_digits(yy, 2) {
        return Err(ExpiryError::Malformed);
    }
    let month: u32 = mm.parse().map_err(|_| ExpiryError::Malformed)?;
    let year: i32 = yy.parse().map_err(|_| ExpiryError::Malformed)?;

    if !(1..=12).contains(&month) {
        return Err(ExpiryError::OutOfRange);
    }

    let current = (today.year() % 100, today.month());
    if (year, month) < current {
        return Err(ExpiryError::Expired);
    }
    Ok(())
}

pub fn validate_cvv(raw: &str) -> Result<(), FieldError> {
    if is_digits(raw, 3) {
        Ok(())
    } else {
        Err(FieldError::CvvLength)
    }
}

fn skip_digits(s: &str) -> Option<&str> {
    let rest = s.trim_start_matches(|c: char| c.is_ascii_digit());
    (rest.len() < s.len()).then_some(rest)
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, nothing else.
fn is_decimal_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let Some(mut rest) = skip_digits(unsigned) else {
        return false;
    };
    if let Some(fraction) = rest.strip_prefix('.') {
        match skip_digits(fraction) {
            Some(after) => rest = after,
            None => return false,
        }
    }
    if let Some(exponent) = rest.strip_prefix(['e', 'E']) {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        match skip_digits(exponent) {
            Some(after) => rest = after,
            None => return false,
        }
    }
    rest.is_empty()
}

/// Parses a plain decimal amount, accepting scientific notation.
///
/// Digit separators, dangling dots and commas are rejected rather than
/// silently reinterpreted.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if !is_decimal_literal(trimmed) {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

pub fn validate_amount(raw: &str) -> Result<(), FieldError> {
    parse_amount(raw).map(|_| ()).ok_or(FieldError::InvalidAmount)
}

pub fn validate_installments(
    deferred: bool,
    value: Option<Installments>,
) -> Result<(), FieldError> {
    if deferred && value.is_none() {
        Err(FieldError::InstallmentsRequired)
    } else {
        Ok(())
    }
}

/// Runs every field check and collects all failures.
pub fn validate_draft(draft: &TransactionDraft, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.record(Field::CardNumber, validate_card_number(&draft.card_number));
    errors.record(
        Field::Expiry,
        validate_expiry(&draft.expiry_month, &draft.expiry_year, today).map_err(FieldError::from),
    );
    errors.record(Field::Cvv, validate_cvv(&draft.cvv));
    errors.record(Field::Amount, validate_amount(&draft.amount));
    errors.record(
        Field::Installments,
        validate_installments(draft.deferred_payment, draft.installments),
    );
    errors
}
