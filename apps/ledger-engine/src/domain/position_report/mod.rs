//! Position report context: end-of-day portfolio annotation.

/// Annotation services.
pub mod services;
/// Portfolio value objects.
pub mod value_objects;

pub use services::{AnnotationContext, DeltaTable, PortfolioAnnotation, PortfolioAnnotator};
pub use value_objects::PortfolioPosition;
