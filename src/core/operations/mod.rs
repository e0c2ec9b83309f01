mod file_ops;
mod partitioner;

pub use file_ops::{
    copy_then_remove, ensure_dir, is_regular_file, move_file, remove_empty_dir, remove_file,
};
pub use partitioner::{split_dataset, DatasetPartitioner, PartitionStats, PartitionSummary};
