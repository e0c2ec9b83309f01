mod annotation;
mod partition;

pub use annotation::{AnnotationRow, AnnotationTable, BoundingBox};
pub use partition::Partition;
