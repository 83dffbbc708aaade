//! Delimited text readers built on the polars CSV reader.
//!
//! Input that is not valid UTF-8 is decoded as Windows-1252, which also
//! covers Latin-1 text.

use crate::dataset::TabularDataset;
use crate::error::{Result, TabcleanError};
use crate::ingest::convert::dataframe_to_dataset;
use encoding_rs::{UTF_8, WINDOWS_1252};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Read a comma-separated file.
pub fn read_csv(path: &Path) -> Result<TabularDataset> {
    read_delimited(path, b',')
}

/// Read a tab-separated file.
pub fn read_tsv(path: &Path) -> Result<TabularDataset> {
    read_delimited(path, b'\t')
}

/// Read a delimited file, trying progressively more lenient strategies.
pub fn read_delimited(path: &Path, separator: u8) -> Result<TabularDataset> {
    let df = load_with_fallbacks(path, separator)?;
    debug!("Loaded {} with shape {:?}", path.display(), df.shape());
    dataframe_to_dataset(&df)
}

fn read_options(separator: u8, quote_char: Option<u8>) -> CsvReadOptions {
    // full scan: a text value late in a column must make it categorical
    CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(quote_char),
        )
}

fn load_with_fallbacks(path: &Path, separator: u8) -> Result<DataFrame> {
    // Strategy 1: standard loading with quote handling
    match read_options(separator, Some(b'"'))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: without quote handling
    match read_options(separator, None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: decoded content
    let content = decode_text(&std::fs::read(path)?);
    match read_options(separator, Some(b'"'))
        .into_reader_with_file_handle(Cursor::new(content.clone()))
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading decoded content failed: {}", e),
    }

    // Strategy 4: decoded and pre-cleaned content
    read_options(separator, Some(b'"'))
        .into_reader_with_file_handle(Cursor::new(clean_content(&content)))
        .finish()
        .map_err(|e| TabcleanError::Ingestion {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Decode as UTF-8 (dropping a byte-order mark), falling back to
/// Windows-1252 when the bytes are not valid UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    debug!("Input is not valid UTF-8, decoding as {}", WINDOWS_1252.name());
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Collapse doubled quotes and drop blank lines.
fn clean_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
