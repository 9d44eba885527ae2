//! Value objects for raw execution data.

mod fill;
mod order;

pub use fill::{CommissionReport, Execution, Fill, FillSide};
pub use order::{ComboLeg, ExecutionReport, LegAction, OrderContract};
