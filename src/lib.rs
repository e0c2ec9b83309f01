//! Train/val/test partitioning for CSV-annotated object-detection datasets.
//!
//! The annotation table is split by image, never by row, so every box of
//! an image ends up in the same partition. Images are moved out of the
//! source directory and the source dataset is removed afterwards.

pub mod config;
pub mod core;
pub mod error;
pub mod infrastructure;

pub use config::PartitionConfig;
pub use crate::core::dataset::{AnnotationRow, AnnotationTable, BoundingBox, Partition};
pub use crate::core::operations::{split_dataset, DatasetPartitioner, PartitionStats, PartitionSummary};
pub use crate::core::split::PartitionPlan;
pub use error::{PartitionError, Result};
