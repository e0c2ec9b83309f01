//! Destructive dataset partitioning.
//!
//! Moves every image referenced by the annotation table from the source
//! directory into `train/`, `val/` or `test/` next to it, writes one
//! annotation table per partition, then deletes the source directory and
//! the source annotation table. Nothing is rolled back on failure.

use std::path::{Component, Path, PathBuf};
use tracing::{info, instrument, warn};

use super::file_ops::{ensure_dir, is_regular_file, move_file, remove_empty_dir, remove_file};
use crate::config::PartitionConfig;
use crate::core::dataset::{AnnotationTable, Partition};
use crate::core::split::PartitionPlan;
use crate::error::{PartitionError, Result};
use crate::infrastructure::progress::create_progress_bar;

/// Counts for one populated partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStats {
    pub partition: Partition,
    pub dir: PathBuf,
    pub images: usize,
    pub rows: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionSummary {
    pub partitions: Vec<PartitionStats>,
}

impl PartitionSummary {
    pub fn get(&self, partition: Partition) -> Option<&PartitionStats> {
        self.partitions.iter().find(|s| s.partition == partition)
    }

    pub fn total_images(&self) -> usize {
        self.partitions.iter().map(|s| s.images).sum()
    }

    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(|s| s.rows).sum()
    }

    pub fn print_summary(&self) {
        info!("=== Partition Summary ===");
        for stats in &self.partitions {
            info!(
                "{:<5} {:>6} images {:>8} rows -> {:?}",
                stats.partition.as_str(),
                stats.images,
                stats.rows,
                stats.dir
            );
        }
        info!(
            "Total: {} images, {} rows",
            self.total_images(),
            self.total_rows()
        );
    }
}

/// Splits a source dataset into train/val/test partitions
#[derive(Debug, Clone, Default)]
pub struct DatasetPartitioner {
    config: PartitionConfig,
}

impl DatasetPartitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Partition the dataset described by `csv_path` whose images live in
    /// `images_dir`.
    ///
    /// Reading, planning and preflight checks happen before the first
    /// filesystem change. On success neither `csv_path` nor `images_dir`
    /// exists any more.
    #[instrument(skip(self))]
    pub fn run(&self, csv_path: &Path, images_dir: &Path) -> Result<PartitionSummary> {
        let table = AnnotationTable::load(csv_path)?;
        if table.is_empty() {
            return Err(PartitionError::EmptyTable(csv_path.to_path_buf()));
        }

        let plan = PartitionPlan::compute(&table, self.config.seed);
        self.preflight(&plan, csv_path, images_dir)?;

        let mut summary = PartitionSummary::default();
        for partition in Partition::ALL {
            let stats = self.populate(partition, plan.get(partition), images_dir)?;
            summary.partitions.push(stats);
        }

        info!("Removing source directory {:?}", images_dir);
        remove_empty_dir(images_dir)?;
        info!("Removing source annotation table {:?}", csv_path);
        remove_file(csv_path)?;

        Ok(summary)
    }

    /// Read-only checks: every referenced image is a plain file name present
    /// in `images_dir`, and nothing in the destinations would be overwritten.
    fn preflight(&self, plan: &PartitionPlan, csv_path: &Path, images_dir: &Path) -> Result<()> {
        let source_table = canonical(csv_path)?;

        for partition in Partition::ALL {
            let dest_dir = partition.dir_for(images_dir);
            if dest_dir == images_dir {
                return Err(PartitionError::DestinationExists(dest_dir));
            }

            for image in plan.get(partition).distinct_images() {
                if !is_plain_file_name(image) {
                    return Err(PartitionError::InvalidImageName {
                        image: image.to_string(),
                    });
                }

                let src = images_dir.join(image);
                if !is_regular_file(&src)? {
                    return Err(PartitionError::MissingFile {
                        image: image.to_string(),
                        dir: images_dir.to_path_buf(),
                    });
                }

                let dest = dest_dir.join(image);
                if dest.exists() {
                    return Err(PartitionError::DestinationExists(dest));
                }
            }

            let table_path = dest_dir.join(&self.config.annotation_file_name);
            if table_path.exists() {
                // Writing here would replace the source table
                if canonical(&table_path)? == source_table {
                    return Err(PartitionError::DestinationExists(table_path));
                }
                warn!("{:?} already exists and will be overwritten", table_path);
            }
        }
        Ok(())
    }

    #[instrument(skip(self, table, images_dir), fields(rows = table.len()))]
    fn populate(
        &self,
        partition: Partition,
        table: &AnnotationTable,
        images_dir: &Path,
    ) -> Result<PartitionStats> {
        let dest_dir = partition.dir_for(images_dir);
        ensure_dir(&dest_dir)?;

        let images = table.distinct_images();
        let pb = create_progress_bar(images.len() as u64, partition.as_str());

        let mut moved = 0;
        for image in &images {
            let src = images_dir.join(image);
            if !is_regular_file(&src)? {
                pb.abandon();
                return Err(PartitionError::MissingFile {
                    image: image.to_string(),
                    dir: images_dir.to_path_buf(),
                });
            }
            move_file(&src, &dest_dir.join(image))?;
            moved += 1;
            pb.inc(1);
        }
        pb.finish_with_message(format!("{} complete", partition));

        let table_path = dest_dir.join(&self.config.annotation_file_name);
        table.write(&table_path)?;

        info!(
            "Populated {} with {} images and {} rows",
            partition,
            moved,
            table.len()
        );
        Ok(PartitionStats {
            partition,
            dir: dest_dir,
            images: moved,
            rows: table.len(),
        })
    }
}

/// True when `image` names a single entry, with no directory part
fn is_plain_file_name(image: &str) -> bool {
    let mut components = Path::new(image).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| PartitionError::io(path, e))
}

/// Partition a dataset with `config`. See [`DatasetPartitioner::run`].
pub fn split_dataset(
    csv_path: &Path,
    images_dir: &Path,
    config: PartitionConfig,
) -> Result<PartitionSummary> {
    DatasetPartitioner::new(config).run(csv_path, images_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("face_01.jpg"));
        assert!(is_plain_file_name("face 01.jpg"));
        assert!(!is_plain_file_name("sub/face_01.jpg"));
        assert!(!is_plain_file_name("../face_01.jpg"));
        assert!(!is_plain_file_name("/tmp/face_01.jpg"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
