pub mod json_backend;
pub mod memory;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key holding the JSON array of expense records.
pub const EXPENSES_KEY: &str = "expenseTracker:expenses:v1";
/// Key holding the monthly budget as a decimal string of cents.
pub const BUDGET_KEY: &str = "expenseTracker:budget:v1";

/// String-keyed persistence capability the ledger writes through.
///
/// Values are whole documents; `set` replaces whatever was stored before.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
