//! The ledger store: canonical expense list, monthly budget, and their
//! persistence.

pub mod store;

pub use store::{
    decode_records, load, load_budget, parse_budget, save, save_budget, LedgerStore, Submission,
};
