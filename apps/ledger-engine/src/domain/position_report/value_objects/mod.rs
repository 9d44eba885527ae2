//! Portfolio value objects.

mod portfolio_position;

pub use portfolio_position::PortfolioPosition;
