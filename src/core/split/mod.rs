mod group_split;
mod plan;

pub use group_split::{group_shuffle_split, holdout_count, GroupSplit};
pub use plan::{PartitionPlan, HOLDOUT_RATIO, TEST_RATIO_OF_HOLDOUT};
