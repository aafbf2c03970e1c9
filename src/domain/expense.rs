use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    currency::{parse_amount_to_cents, MAX_AMOUNT_CENTS},
    errors::ValidationError,
};

use super::Category;

const ID_PREFIX: &str = "exp";
const RANDOM_SPAN: u128 = 1_000_000_000;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier assigned to an expense when it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds `exp_<millis>_<random>` with both parts rendered in base 36.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let random = (Uuid::new_v4().as_u128() % RANDOM_SPAN) as u64;
        Self(format!(
            "{}_{}_{}",
            ID_PREFIX,
            to_base36(millis),
            to_base36(random)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// A single recorded expense. Records are never edited, only deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub amount_cents: i64,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
}

impl ExpenseRecord {
    pub fn from_new(id: ExpenseId, expense: NewExpense) -> Self {
        Self {
            id,
            amount_cents: expense.amount_cents,
            category: expense.category,
            date: expense.date,
            description: expense.description,
        }
    }

    /// True when the record falls in the calendar month containing `reference`.
    pub fn in_month_of(&self, reference: NaiveDate) -> bool {
        self.date.year() == reference.year() && self.date.month() == reference.month()
    }
}

/// A validated expense that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount_cents: i64,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
}

/// Raw form values as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

impl ExpenseInput {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
            description: description.into(),
        }
    }

    /// Checks the input in form order and produces a [`NewExpense`].
    pub fn validate(&self, today: NaiveDate) -> Result<NewExpense, ValidationError> {
        let amount_cents =
            parse_amount_to_cents(&self.amount).ok_or(ValidationError::InvalidAmount)?;
        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| ValidationError::UnknownCategory)?;
        let date = parse_iso_date(&self.date).ok_or(ValidationError::InvalidDate)?;
        if date > today {
            return Err(ValidationError::FutureDate);
        }
        Ok(NewExpense {
            amount_cents,
            category,
            date,
            description: self.description.trim().to_string(),
        })
    }
}

/// Why a persisted item could not be turned back into an [`ExpenseRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),
    #[error("amount {0} exceeds the per-expense limit")]
    AmountTooLarge(i64),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("malformed date `{0}`")]
    MalformedDate(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExpenseRecord {
    id: String,
    amount_cents: i64,
    category: String,
    date: String,
    description: String,
}

/// Decodes one persisted item, checking every record invariant.
pub fn decode_record(value: &serde_json::Value) -> Result<ExpenseRecord, RecordRejection> {
    let raw = RawExpenseRecord::deserialize(value)
        .map_err(|err| RecordRejection::Malformed(err.to_string()))?;
    if raw.amount_cents <= 0 {
        return Err(RecordRejection::NonPositiveAmount(raw.amount_cents));
    }
    if raw.amount_cents > MAX_AMOUNT_CENTS {
        return Err(RecordRejection::AmountTooLarge(raw.amount_cents));
    }
    let category = raw
        .category
        .parse::<Category>()
        .map_err(|_| RecordRejection::UnknownCategory(raw.category.clone()))?;
    let date = parse_iso_date(&raw.date).ok_or(RecordRejection::MalformedDate(raw.date))?;
    Ok(ExpenseRecord {
        id: ExpenseId(raw.id),
        amount_cents: raw.amount_cents,
        category,
        date,
        description: raw.description,
    })
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
