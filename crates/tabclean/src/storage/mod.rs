//! Dataset storage.
//!
//! Each dataset is stored as one JSON document named after its
//! [`DatasetId`]. Writes go to a temporary file in the same directory that is
//! then renamed into place, so a reader sees either no file or a complete one.

mod id;

pub use id::DatasetId;

use crate::dataset::TabularDataset;
use crate::error::{Result, ResultExt, TabcleanError};
use crate::ingest::dataset_to_dataframe;
use chrono::{DateTime, Utc};
use polars::prelude::{CsvWriter, SerWriter};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the default store directory.
pub const STORE_DIR_ENV: &str = "TABCLEAN_STORE_DIR";

/// Store directory used when neither a flag nor the environment names one.
pub const DEFAULT_STORE_DIR: &str = ".tabclean/datasets";

/// On-disk record of a stored dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDataset {
    pub id: DatasetId,
    pub stored_at: DateTime<Utc>,
    pub dataset: TabularDataset,
}

/// A directory of stored datasets.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).context(format!("creating store {}", root.display()))?;
        debug!("Opened dataset store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &DatasetId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Store `dataset` under a fresh identity.
    pub fn save(&self, dataset: &TabularDataset) -> Result<DatasetId> {
        let id = DatasetId::generate();
        let record = StoredDataset {
            id: id.clone(),
            stored_at: Utc::now(),
            dataset: dataset.clone(),
        };

        let target = self.path_for(&id);
        let tmp = self.root.join(format!(".{}.json.tmp", id));
        write_atomically(&record, &tmp, &target)?;

        info!(
            "Stored dataset {} ({} rows x {} columns)",
            id,
            dataset.n_rows(),
            dataset.n_cols()
        );
        Ok(id)
    }

    /// Full stored record, including when it was written.
    pub fn load_record(&self, id: &DatasetId) -> Result<StoredDataset> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(TabcleanError::DatasetNotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let record: StoredDataset = serde_json::from_str(&content)
            .map_err(|e| TabcleanError::Json(e).with_context(format!("dataset {}", id)))?;
        Ok(record)
    }

    /// The dataset stored under `id`.
    pub fn load(&self, id: &DatasetId) -> Result<TabularDataset> {
        self.load_record(id).map(|record| record.dataset)
    }

    pub fn exists(&self, id: &DatasetId) -> bool {
        self.path_for(id).is_file()
    }

    /// Write `dataset` as CSV with a header row.
    pub fn export_csv(dataset: &TabularDataset, path: &Path) -> Result<()> {
        let mut df = dataset_to_dataframe(dataset)?;
        let mut file = File::create(path).context(format!("creating {}", path.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;
        info!("Exported {} rows to {}", dataset.n_rows(), path.display());
        Ok(())
    }
}

/// Write `record` to `tmp`, then rename it over `target`.
///
/// On any failure the temporary file is removed before the error is
/// returned.
fn write_atomically(record: &StoredDataset, tmp: &Path, target: &Path) -> Result<()> {
    let written = write_record(record, tmp).and_then(|()| {
        fs::rename(tmp, target).context(format!("moving {} into place", target.display()))
    });
    if written.is_err()
        && tmp.exists()
        && let Err(e) = fs::remove_file(tmp)
    {
        warn!("Could not remove temporary file {}: {}", tmp.display(), e);
    }
    written
}

fn write_record(record: &StoredDataset, path: &Path) -> Result<()> {
    let file = File::create(path).context(format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}
