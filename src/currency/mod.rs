use std::str::FromStr;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Largest amount a single expense may carry: one billion in major units.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// ISO 4217 currency representation. Only the display symbol depends on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "PHP" => "₱".into(),
        _ => format!("{code} "),
    }
}

/// Parses user-entered decimal text into a positive number of cents.
///
/// Returns `None` for anything that is not a finite amount above zero, or
/// that exceeds [`MAX_AMOUNT_CENTS`].
pub fn parse_amount_to_cents(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    if value <= Decimal::ZERO {
        return None;
    }
    let cents = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()?;
    (cents > 0 && cents <= MAX_AMOUNT_CENTS).then_some(cents)
}

/// Renders cents as a plain two-decimal string, e.g. `1250` → `12.50`.
pub fn cents_to_decimal_string(cents: i64) -> String {
    Decimal::new(cents, 2).to_string()
}

/// Formats cents for display, e.g. `$1,234.50` or `-$5.00`.
pub fn format_cents(cents: i64, code: &CurrencyCode) -> String {
    let plain = cents_to_decimal_string(cents.saturating_abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let body = format!("{}.{}", group_digits(int_part, ','), frac_part);
    let symbol = symbol_for(code.as_str());
    if cents < 0 {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

/// Formats with the default (USD) symbol.
pub fn format_usd(cents: i64) -> String {
    format_cents(cents, &CurrencyCode::default())
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
