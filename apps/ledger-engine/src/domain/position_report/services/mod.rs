//! Annotation services.

mod annotator;

pub use annotator::{AnnotationContext, DeltaTable, PortfolioAnnotation, PortfolioAnnotator};
