//! Shared value objects.

mod contract;
mod symbol;

pub use contract::Contract;
pub use symbol::{RowKey, Symbol};
