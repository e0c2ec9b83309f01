use csv::StringRecord;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PartitionError, Result};

const IMAGE_COLUMN: &str = "image_name";
const LABEL_COLUMN: &str = "label";

/// Bounding box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A single bounding-box annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    /// File name of the annotated image, also the grouping key
    pub image: String,
    pub bbox: BoundingBox,
    /// `None` means the implicit single class
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    image_name: String,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    #[serde(default)]
    label: Option<String>,
}

impl From<CsvRecord> for AnnotationRow {
    fn from(record: CsvRecord) -> Self {
        Self {
            image: record.image_name,
            bbox: BoundingBox {
                x0: record.x0,
                y0: record.y0,
                x1: record.x1,
                y1: record.y1,
            },
            label: record.label,
        }
    }
}

/// Ordered annotation rows, one per bounding box.
///
/// Several rows may share an image; the table keeps the source order. Next
/// to the typed rows it holds the source header and the raw records, so
/// columns it does not interpret are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    header: StringRecord,
    rows: Vec<AnnotationRow>,
    records: Vec<StringRecord>,
}

impl AnnotationTable {
    /// Build a table from typed rows with the canonical
    /// `image_name,x0,y0,x1,y1[,label]` schema
    pub fn new(rows: Vec<AnnotationRow>, has_label_column: bool) -> Self {
        let mut header = StringRecord::from(vec![IMAGE_COLUMN, "x0", "y0", "x1", "y1"]);
        if has_label_column {
            header.push_field(LABEL_COLUMN);
        }

        let records = rows
            .iter()
            .map(|row| {
                let BoundingBox { x0, y0, x1, y1 } = row.bbox;
                let mut record = StringRecord::from(vec![
                    row.image.clone(),
                    x0.to_string(),
                    y0.to_string(),
                    x1.to_string(),
                    y1.to_string(),
                ]);
                if has_label_column {
                    record.push_field(row.label.as_deref().unwrap_or_default());
                }
                record
            })
            .collect();

        Self {
            header,
            rows,
            records,
        }
    }

    /// Load a table from a CSV file whose header names at least
    /// `image_name,x0,y0,x1,y1`. `label` and any other column are optional.
    pub fn load(path: &Path) -> Result<Self> {
        let read_err = |source| PartitionError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(read_err)?;

        let header = reader.headers().map_err(read_err)?.clone();
        let mut fields = header.clone();
        fields.trim();

        let mut rows = Vec::new();
        let mut records = Vec::new();
        for record in reader.records() {
            let mut record = record.map_err(read_err)?;

            let mut trimmed = record.clone();
            trimmed.trim();
            let parsed: CsvRecord = trimmed.deserialize(Some(&fields)).map_err(read_err)?;

            // Short rows are padded so every written record matches the header
            while record.len() < header.len() {
                record.push_field("");
            }
            rows.push(AnnotationRow::from(parsed));
            records.push(record);
        }

        info!("Loaded {} annotation rows from {:?}", rows.len(), path);
        Ok(Self {
            header,
            rows,
            records,
        })
    }

    /// Write the table as CSV under the source header, each record as read
    pub fn write(&self, path: &Path) -> Result<()> {
        let write_err = |source| PartitionError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(write_err)?;

        writer.write_record(&self.header).map_err(write_err)?;
        for record in &self.records {
            writer.write_record(record).map_err(write_err)?;
        }

        writer
            .flush()
            .map_err(|e| PartitionError::io(path, e))?;
        debug!("Wrote {} rows to {:?}", self.rows.len(), path);
        Ok(())
    }

    pub fn rows(&self) -> &[AnnotationRow] {
        &self.rows
    }

    /// Column names as they appear in the source
    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_label_column(&self) -> bool {
        self.header.iter().any(|h| h.trim() == LABEL_COLUMN)
    }

    /// Distinct image identifiers in sorted order
    pub fn distinct_images(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.image.as_str()).collect()
    }

    /// Rows whose image is in `images`, in source order
    pub fn select(&self, images: &HashSet<&str>) -> AnnotationTable {
        let (rows, records): (Vec<_>, Vec<_>) = self
            .rows
            .iter()
            .zip(&self.records)
            .filter(|(row, _)| images.contains(row.image.as_str()))
            .map(|(row, record)| (row.clone(), record.clone()))
            .unzip();
        AnnotationTable {
            header: self.header.clone(),
            rows,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("faces.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_without_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "image_name,x0,y0,x1,y1\na.jpg,1,2,30,40\na.jpg,5,6,7,8\nb.jpg,0,0,10,10\n",
        );

        let table = AnnotationTable::load(&path).unwrap();

        assert_eq!(table.len(), 3);
        assert!(!table.has_label_column());
        assert_eq!(table.rows()[0].image, "a.jpg");
        assert_eq!(
            table.rows()[0].bbox,
            BoundingBox {
                x0: 1.0,
                y0: 2.0,
                x1: 30.0,
                y1: 40.0
            }
        );
        assert!(table.rows().iter().all(|r| r.label.is_none()));
        assert_eq!(
            table.distinct_images().into_iter().collect::<Vec<_>>(),
            vec!["a.jpg", "b.jpg"]
        );
    }

    #[test]
    fn test_load_with_label_column_and_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "image_name,x0,y0,x1,y1,label\na.jpg,1,2,3,4,face\nb.jpg,1,2,3,4,\n",
        );

        let table = AnnotationTable::load(&path).unwrap();

        assert!(table.has_label_column());
        assert_eq!(table.rows()[0].label.as_deref(), Some("face"));
        assert_eq!(table.rows()[1].label, None);
    }

    #[test]
    fn test_load_malformed_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "image_name,x0,y0,x1,y1\na.jpg,one,2,3,4\n");

        let err = AnnotationTable::load(&path).unwrap_err();
        assert!(matches!(err, PartitionError::Read { .. }));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnnotationTable::load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, PartitionError::Read { .. }));
    }

    #[test]
    fn test_write_reproduces_source_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(
            dir.path(),
            "image_name,x0,y0,x1,y1\na.jpg,1,2,30,40\nb.jpg,0.5,0,10,10\n",
        );
        let table = AnnotationTable::load(&source).unwrap();

        let out = dir.path().join("out.csv");
        table.write(&out).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "image_name,x0,y0,x1,y1\na.jpg,1,2,30,40\nb.jpg,0.5,0,10,10\n"
        );
    }

    #[test]
    fn test_write_keeps_extra_columns_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(
            dir.path(),
            "image_name,width,height,x0,y0,x1,y1\na.jpg,640,480,1.0,2,3,4\nb.jpg,800,600,5,6.50,7,8\n",
        );
        let table = AnnotationTable::load(&source).unwrap();
        assert_eq!(table.rows()[0].bbox.x0, 1.0);
        assert!(!table.has_label_column());

        let out = dir.path().join("out.csv");
        table
            .select(&HashSet::from(["b.jpg"]))
            .write(&out)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "image_name,width,height,x0,y0,x1,y1\nb.jpg,800,600,5,6.50,7,8\n"
        );
    }

    #[test]
    fn test_short_row_is_padded_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_csv(dir.path(), "image_name,x0,y0,x1,y1,label\na.jpg,1,2,3,4\n");
        let table = AnnotationTable::load(&source).unwrap();
        assert_eq!(table.rows()[0].label, None);

        let out = dir.path().join("out.csv");
        table.write(&out).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "image_name,x0,y0,x1,y1,label\na.jpg,1,2,3,4,\n"
        );
    }

    #[test]
    fn test_new_uses_canonical_schema() {
        let table = AnnotationTable::new(
            vec![AnnotationRow {
                image: "a.jpg".to_string(),
                bbox: BoundingBox {
                    x0: 1.0,
                    y0: 2.5,
                    x1: 3.0,
                    y1: 4.0,
                },
                label: Some("face".to_string()),
            }],
            true,
        );

        assert!(table.has_label_column());
        assert_eq!(
            table.header(),
            &StringRecord::from(vec!["image_name", "x0", "y0", "x1", "y1", "label"])
        );
    }

    #[test]
    fn test_select_keeps_source_order() {
        let row = |image: &str, x0: f64| AnnotationRow {
            image: image.to_string(),
            bbox: BoundingBox {
                x0,
                y0: 0.0,
                x1: 1.0,
                y1: 1.0,
            },
            label: None,
        };
        let table = AnnotationTable::new(
            vec![row("b.jpg", 1.0), row("a.jpg", 2.0), row("b.jpg", 3.0)],
            false,
        );

        let selected = table.select(&HashSet::from(["b.jpg"]));

        let xs: Vec<f64> = selected.rows().iter().map(|r| r.bbox.x0).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }
}
