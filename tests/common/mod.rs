#![allow(dead_code)]

use chrono::NaiveDate;
use expense_ledger::{
    domain::{Category, ExpenseId, ExpenseRecord},
    ledger::LedgerStore,
    storage::{JsonFileStore, MemoryStore},
};
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn record(
    id: &str,
    amount_cents: i64,
    category: Category,
    on: NaiveDate,
    description: &str,
) -> ExpenseRecord {
    ExpenseRecord {
        id: ExpenseId::new(id),
        amount_cents,
        category,
        date: on,
        description: description.into(),
    }
}

/// Ledger over a fresh in-memory store.
pub fn memory_ledger() -> LedgerStore {
    LedgerStore::open(Box::new(MemoryStore::new()))
}

/// File-backed store rooted in a temp directory. Keep the guard alive for
/// as long as the store is used.
pub fn file_backend() -> (JsonFileStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let storage =
        JsonFileStore::new(Some(temp.path().join("data"))).expect("create json file store");
    (storage, temp)
}

/// Reopens a ledger over the same directory, as a second session would.
pub fn reopen(storage: &JsonFileStore) -> LedgerStore {
    LedgerStore::open(Box::new(storage.clone()))
}
