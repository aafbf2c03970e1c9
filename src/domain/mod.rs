//! Expense domain models and persistence-friendly types.

pub mod category;
pub mod expense;

pub use category::{Category, UnknownCategory};
pub use expense::{
    decode_record, parse_iso_date, ExpenseId, ExpenseInput, ExpenseRecord, NewExpense,
    RecordRejection,
};
