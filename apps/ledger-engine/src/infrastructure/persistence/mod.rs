//! Ledger store adapters.

mod in_memory;
mod json_store;

pub use in_memory::InMemoryLedgerStore;
pub use json_store::JsonLedgerStore;
