use std::collections::{BTreeSet, HashSet};
use tracing::{info, instrument};

use super::group_split::group_shuffle_split;
use crate::core::dataset::{AnnotationTable, Partition};

/// Share of images held out of train (then shared by val and test)
pub const HOLDOUT_RATIO: f64 = 0.20;
/// Share of the holdout that goes to test; val receives the rest
pub const TEST_RATIO_OF_HOLDOUT: f64 = 0.50;

/// In-memory assignment of rows to partitions, computed before any move
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionPlan {
    pub train: AnnotationTable,
    pub val: AnnotationTable,
    pub test: AnnotationTable,
}

impl PartitionPlan {
    /// Split `table` by image into train (80%), val (10%) and test (10%).
    ///
    /// Both stages reseed from `seed`, so the plan depends only on the
    /// table contents, its row order and the seed.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn compute(table: &AnnotationTable, seed: u64) -> Self {
        let images = table.distinct_images();
        let first = group_shuffle_split(&images, HOLDOUT_RATIO, seed);
        let second = group_shuffle_split(&first.holdout, TEST_RATIO_OF_HOLDOUT, seed);

        let select = |set: &BTreeSet<&str>| {
            let ids: HashSet<&str> = set.iter().copied().collect();
            table.select(&ids)
        };

        let plan = Self {
            train: select(&first.kept),
            val: select(&second.kept),
            test: select(&second.holdout),
        };

        info!(
            "Planned {} images: train={}, val={}, test={}",
            images.len(),
            first.kept.len(),
            second.kept.len(),
            second.holdout.len()
        );
        plan
    }

    pub fn get(&self, partition: Partition) -> &AnnotationTable {
        match partition {
            Partition::Train => &self.train,
            Partition::Val => &self.val,
            Partition::Test => &self.test,
        }
    }

    /// Total rows across the three partitions
    pub fn total_rows(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}
