//! Trade capture context: raw execution fills and their normalization.

/// Pure services over fill data.
pub mod services;
/// Fill and order value objects.
pub mod value_objects;

pub use services::{ComboClassifier, ComboKind, FillProjector, TradeLeg};
pub use value_objects::{
    ComboLeg, CommissionReport, Execution, ExecutionReport, Fill, FillSide, LegAction,
    OrderContract,
};
