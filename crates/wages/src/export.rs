use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use wages_parser::WageObservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("parquet") => Ok(ExportFormat::Parquet),
            Some("json") => Ok(ExportFormat::Json),
            _ => bail!(
                "cannot infer export format from {}; use a .csv, .parquet or .json extension",
                path.display()
            ),
        }
    }
}

/// Writes one export. `frame` and `observations` hold the same rows; JSON is written
/// from the observations, the tabular formats from the frame.
pub fn write_file(
    frame: &DataFrame,
    observations: &[WageObservation],
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(frame, &mut writer)?,
        ExportFormat::Parquet => write_parquet(frame, &mut writer)?,
        ExportFormat::Json => serde_json::to_writer_pretty(&mut writer, observations)
            .context("failed to write JSON export")?,
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut clone = df.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut clone)
        .context("failed to write CSV export")
}

fn write_parquet<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut clone = df.clone();
    ParquetWriter::new(writer)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut clone)
        .context("failed to write parquet export")?;
    Ok(())
}
