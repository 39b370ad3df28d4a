use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cleaner::CleanedWage;
use crate::errors::ParserError;

pub const WAGE_COLUMNS: [&str; 6] = [
    "province",
    "sector",
    "job_category",
    "gender",
    "year",
    "daily_wage",
];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Gender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "femal" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{other}'")),
        }
    }
}

/// One line of the source report before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub label: String,
    pub cells: Vec<CleanedWage>,
}

impl RawRow {
    pub fn new(label: impl Into<String>, cells: Vec<CleanedWage>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageObservation {
    pub province: String,
    pub sector: String,
    pub job_category: String,
    pub gender: Gender,
    pub year: i32,
    pub daily_wage: f64,
}

/// Counters collected during a single parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub rows_read: usize,
    pub blank_rows: usize,
    pub header_rows: usize,
    pub leaf_rows: usize,
    pub observations: usize,
    pub cells_dropped: usize,
}

/// Immutable long-format result of parsing one report.
#[derive(Debug, Clone, PartialEq)]
pub struct WageTable {
    years: Vec<i32>,
    observations: Vec<WageObservation>,
    stats: ParseStats,
}

impl WageTable {
    pub fn new(years: Vec<i32>, observations: Vec<WageObservation>, stats: ParseStats) -> Self {
        Self {
            years,
            observations,
            stats,
        }
    }

    /// Year columns in header order, including years that produced no observations.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn observations(&self) -> &[WageObservation] {
        &self.observations
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Materializes the observations as a frame with [`WAGE_COLUMNS`].
    pub fn to_dataframe(&self) -> Result<DataFrame, ParserError> {
        let rows = &self.observations;
        let columns: Vec<Column> = vec![
            Series::new(
                "province".into(),
                rows.iter().map(|o| o.province.as_str()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "sector".into(),
                rows.iter().map(|o| o.sector.as_str()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "job_category".into(),
                rows.iter()
                    .map(|o| o.job_category.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "gender".into(),
                rows.iter().map(|o| o.gender.as_str()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "year".into(),
                rows.iter().map(|o| o.year).collect::<Vec<i32>>(),
            )
            .into(),
            Series::new(
                "daily_wage".into(),
                rows.iter().map(|o| o.daily_wage).collect::<Vec<f64>>(),
            )
            .into(),
        ];

        DataFrame::new(columns).map_err(|err| ParserError::Frame {
            message: err.to_string(),
        })
    }
}
