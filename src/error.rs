use std::path::PathBuf;

/// Result type for partitioning operations
pub type Result<T> = std::result::Result<T, PartitionError>;

/// Error types for partitioning operations
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The annotation table is absent or malformed
    #[error("failed to read annotation table {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The annotation table has no rows
    #[error("annotation table {0:?} contains no rows")]
    EmptyTable(PathBuf),

    /// An image referenced by the table is not in the source directory
    #[error("image {image:?} referenced by the annotation table is missing from {dir:?}")]
    MissingFile { image: String, dir: PathBuf },

    /// The image identifier is not a plain file name inside the source directory
    #[error("image {image:?} is not a plain file name")]
    InvalidImageName { image: String },

    /// A file with the same name already sits in the destination partition
    #[error("destination {0:?} already exists")]
    DestinationExists(PathBuf),

    /// The source directory still holds entries not referenced by the table
    #[error("source directory {path:?} is not empty after moving images ({remaining} entries left)")]
    NonEmptyDirectory { path: PathBuf, remaining: usize },

    #[error("failed to write annotation table {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but could not be parsed
    #[error("invalid configuration file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PartitionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PartitionError::Io {
            path: path.into(),
            source,
        }
    }
}
