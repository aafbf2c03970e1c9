#![doc(test(attr(deny(warnings))))]

//! Expense Ledger offers the record store, query, budgeting, and export
//! primitives behind a single-user expense tracker and its CLI.

pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod query;
pub mod storage;
pub mod time;
pub mod utils;

pub use domain::{Category, ExpenseId, ExpenseInput, ExpenseRecord, NewExpense};
pub use errors::{LedgerError, ValidationError};
pub use ledger::LedgerStore;
pub use query::{BudgetAlert, BudgetState, BudgetStatus, FilterSpec};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Ledger tracing initialized.");
    });
}
