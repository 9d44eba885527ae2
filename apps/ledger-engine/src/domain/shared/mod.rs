//! Shared domain primitives used across bounded contexts.

/// Value objects shared by every context.
pub mod value_objects;

pub use value_objects::{Contract, RowKey, Symbol};
