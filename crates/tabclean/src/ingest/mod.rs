//! Ingestion module.
//!
//! A [`ReaderRegistry`] maps file extensions to reader functions. It is an
//! ordinary value: build it once (usually with
//! [`ReaderRegistry::with_defaults`]) and pass it to whatever loads files.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabclean::ingest::ReaderRegistry;
//!
//! let registry = ReaderRegistry::with_defaults();
//! let dataset = registry.read("data/customers.csv".as_ref())?;
//! ```

pub mod convert;
pub mod csv;
pub mod json;
pub mod parquet;

pub use convert::{dataframe_to_dataset, dataset_to_dataframe};

use crate::dataset::TabularDataset;
use crate::error::{Result, ResultExt, TabcleanError};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A function that loads a dataset from a file.
pub type ReaderFn = Arc<dyn Fn(&Path) -> Result<TabularDataset> + Send + Sync>;

/// Lowercase an extension and strip a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Maps normalized file extensions to readers.
#[derive(Clone, Default)]
pub struct ReaderRegistry {
    readers: HashMap<String, ReaderFn>,
}

static_assertions::assert_impl_all!(ReaderRegistry: Send, Sync);

impl ReaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in readers: comma-separated `csv`, `txt` and
    /// `log`, tab-separated `tsv`, `parquet`, `json`, and JSON Lines under
    /// `jsonl` or `ndjson`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(&["csv", "txt", "log"], csv::read_csv)
            .register(&["tsv"], csv::read_tsv)
            .register(&["parquet"], parquet::read_parquet)
            .register(&["json"], json::read_json)
            .register(&["jsonl", "ndjson"], json::read_json_lines);
        registry
    }

    /// Register `reader` for every extension in `extensions`, replacing any
    /// reader already registered for them.
    pub fn register<F>(&mut self, extensions: &[&str], reader: F) -> &mut Self
    where
        F: Fn(&Path) -> Result<TabularDataset> + Send + Sync + 'static,
    {
        let reader: ReaderFn = Arc::new(reader);
        for extension in extensions {
            let key = normalize_extension(extension);
            debug!("Registering reader for .{}", key);
            self.readers.insert(key, Arc::clone(&reader));
        }
        self
    }

    /// Reader registered for `extension` (any case, with or without a dot).
    pub fn reader_for(&self, extension: &str) -> Result<&ReaderFn> {
        let key = normalize_extension(extension);
        self.readers
            .get(&key)
            .ok_or(TabcleanError::UnsupportedFormat(key))
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.readers.contains_key(&normalize_extension(extension))
    }

    /// Registered extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Load `path` with the reader registered for its extension.
    pub fn read(&self, path: &Path) -> Result<TabularDataset> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let reader = self.reader_for(extension)?;

        info!("Loading dataset from: {}", path.display());
        let dataset = reader(path).context(format!("loading {}", path.display()))?;
        info!(
            "Dataset loaded: {} rows x {} columns",
            dataset.n_rows(),
            dataset.n_cols()
        );
        Ok(dataset)
    }
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".CSV"), "csv");
        assert_eq!(normalize_extension("Parquet"), "parquet");
    }

    #[test]
    fn test_default_extensions() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(
            registry.supported_extensions(),
            vec!["csv", "json", "jsonl", "log", "ndjson", "parquet", "tsv", "txt"]
        );
        assert!(registry.supports(".Csv"));
    }

    #[test]
    fn test_unregistered_extension() {
        let registry = ReaderRegistry::with_defaults();
        let err = registry.reader_for(".xlsx").err().unwrap();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");

        let err = registry.read(Path::new("data/report.xlsx")).unwrap_err();
        assert!(matches!(err, TabcleanError::UnsupportedFormat(ref ext) if ext == "xlsx"));
        assert!(ReaderRegistry::new().read(Path::new("noext")).is_err());
    }

    #[test]
    fn test_custom_reader() {
        let mut registry = ReaderRegistry::new();
        registry.register(&[".Fake"], |_path: &Path| {
            TabularDataset::from_columns(vec![Column::numeric("x", vec![Some(1.0)])])
        });
        let ds = registry.read(Path::new("anything.FAKE")).unwrap();
        assert_eq!(ds.n_rows(), 1);
    }
}
