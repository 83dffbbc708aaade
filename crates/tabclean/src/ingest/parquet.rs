//! Parquet reader.

use crate::dataset::TabularDataset;
use crate::error::{Result, ResultExt};
use crate::ingest::convert::dataframe_to_dataset;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub fn read_parquet(path: &Path) -> Result<TabularDataset> {
    let file = File::open(path).context(format!("opening {}", path.display()))?;
    let df = ParquetReader::new(file)
        .finish()
        .context(format!("reading parquet {}", path.display()))?;
    dataframe_to_dataset(&df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_parquet() {
        let mut df = df! {
            "x" => [1.0f64, 2.0, 3.0],
            "c" => ["a", "b", "a"],
        }
        .unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        ParquetWriter::new(File::create(file.path()).unwrap())
            .finish(&mut df)
            .unwrap();

        let ds = read_parquet(file.path()).unwrap();
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.column("c").unwrap().as_categorical().unwrap()[1].as_deref(), Some("b"));
    }
}
