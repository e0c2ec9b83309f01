use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three disjoint dataset partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Train,
    Val,
    Test,
}

impl Partition {
    /// Partitions in the order they are populated
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Val, Partition::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Val => "val",
            Partition::Test => "test",
        }
    }

    /// Directory for this partition, sibling to the source image directory.
    ///
    /// An image directory without a parent component (e.g. `images`) places
    /// the partitions in the current directory.
    pub fn dir_for(&self, images_dir: &Path) -> PathBuf {
        images_dir
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(self.as_str())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
