use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::info;
use wages_parser::{parse_wage_report_bytes, ReportLayout, WageTable};

use crate::error::{LoadError, Result};

/// A parsed report together with its frame and the identity of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source_path: PathBuf,
    pub source_hash: String,
    pub table: WageTable,
    pub frame: DataFrame,
}

pub fn hash_source(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    })
}

/// Reads and parses the report at `path`.
pub fn load_wage_table(path: &Path, layout: &ReportLayout) -> Result<LoadedTable> {
    let bytes = read_source(path)?;
    load_from_bytes(path, &bytes, layout)
}

/// Parses report bytes that were already read from `path`.
pub fn load_from_bytes(path: &Path, bytes: &[u8], layout: &ReportLayout) -> Result<LoadedTable> {
    let table = parse_wage_report_bytes(bytes, layout).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    let frame = table.to_dataframe().map_err(|source| LoadError::Frame {
        path: path.to_path_buf(),
        source,
    })?;
    let source_hash = hash_source(bytes);

    info!(
        path = %path.display(),
        hash = %source_hash,
        observations = table.len(),
        "Loaded wage table"
    );

    Ok(LoadedTable {
        source_path: path.to_path_buf(),
        source_hash,
        table,
        frame,
    })
}
