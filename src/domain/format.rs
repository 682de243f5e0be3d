//! Keystroke normalization for the card form.
//!
//! Every function takes whatever the user typed and returns the value the
//! form should display. None of them fail: garbage is simply dropped.

const CARD_DIGITS: usize = 16;
const EXPIRY_DIGITS: usize = 4;
const CVV_DIGITS: usize = 3;

fn digits(raw: &str, limit: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(limit).collect()
}

/// Digits only, at most 16, grouped by four with single spaces.
pub fn format_card_number(raw: &str) -> String {
    let cleaned = digits(raw, CARD_DIGITS);
    let mut formatted = String::with_capacity(cleaned.len() + 3);
    for (i, c) in cleaned.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

/// Digits only, at most four, rendered as `MM/YY`.
///
/// The slash only appears once the year has at least one digit.
pub fn format_expiry(raw: &str) -> String {
    let cleaned = digits(raw, EXPIRY_DIGITS);
    let (mm, yy) = cleaned.split_at(cleaned.len().min(2));
    if yy.is_empty() {
        mm.to_string()
    } else {
        format!("{mm}/{yy}")
    }
}

/// Splits a formatted expiry into its month and year parts.
pub fn split_expiry(formatted: &str) -> (String, String) {
    match formatted.split_once('/') {
        Some((mm, yy)) => (mm.to_string(), yy.to_string()),
        None => (formatted.to_string(), String::new()),
    }
}

/// Keeps up to three digits; anything longer than three characters is ignored
/// and `previous` stays on screen.
pub fn format_cvv(previous: &str, raw: &str) -> String {
    if raw.chars().count() > CVV_DIGITS {
        return previous.to_string();
    }
    digits(raw, CVV_DIGITS)
}
