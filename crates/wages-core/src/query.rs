use std::collections::BTreeSet;

use polars::prelude::*;
use serde::Serialize;
use wages_parser::{Gender, WageObservation};

/// Selector value meaning "do not filter on this column".
pub const ALL: &str = "All";

const MEAN_COLUMN: &str = "mean_daily_wage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl Selection<String> {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(ALL) {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }
}

impl Selection<Gender> {
    pub fn parse_gender(value: &str) -> Result<Self, String> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Ok(Selection::All);
        }
        Gender::try_from(value).map(Selection::Only)
    }
}

/// Filter over the normalized wage frame. The default selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WageFilter {
    pub province: Selection<String>,
    pub sector: Selection<String>,
    /// Inclusive year range; `None` keeps every year.
    pub years: Option<(i32, i32)>,
    pub gender: Selection<Gender>,
}

impl WageFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Selection::Only(province.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Selection::Only(sector.into());
        self
    }

    pub fn with_years(mut self, from: i32, to: i32) -> Self {
        self.years = Some((from, to));
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Selection::Only(gender);
        self
    }

    /// Row-level form of the filter, for callers holding observations rather than a frame.
    pub fn matches(&self, observation: &WageObservation) -> bool {
        let selected = |selection: &Selection<String>, value: &str| match selection {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        };
        selected(&self.province, &observation.province)
            && selected(&self.sector, &observation.sector)
            && self
                .years
                .map_or(true, |(from, to)| (from..=to).contains(&observation.year))
            && self
                .gender
                .as_only()
                .map_or(true, |gender| *gender == observation.gender)
    }

    fn predicate(&self) -> Expr {
        let mut predicate = lit(true);
        if let Selection::Only(province) = &self.province {
            predicate = predicate.and(col("province").eq(lit(province.as_str())));
        }
        if let Selection::Only(sector) = &self.sector {
            predicate = predicate.and(col("sector").eq(lit(sector.as_str())));
        }
        if let Selection::Only(gender) = &self.gender {
            predicate = predicate.and(col("gender").eq(lit(gender.as_str())));
        }
        predicate
    }
}

/// Applies the label selections lazily and the year range as an eager mask.
///
/// Integer literals in a lazy comparison panic when the plan is collected, so the year
/// bound never goes through `lit`.
pub fn apply_filter(df: &DataFrame, filter: &WageFilter) -> PolarsResult<DataFrame> {
    let selected = df.clone().lazy().filter(filter.predicate()).collect()?;
    match filter.years {
        Some((from, to)) => {
            let years = selected.column("year")?.i32()?;
            let mask = years.gt_eq(from) & years.lt_eq(to);
            selected.filter(&mask)
        }
        None => Ok(selected),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WageSummary {
    pub records: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize(df: &DataFrame) -> PolarsResult<WageSummary> {
    let wages = df.column("daily_wage")?.f64()?;
    Ok(WageSummary {
        records: df.height(),
        mean: wages.mean(),
        min: wages.min(),
        max: wages.max(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub provinces: Vec<String>,
    pub sectors: Vec<String>,
    pub genders: Vec<String>,
    pub year_bounds: Option<(i32, i32)>,
}

/// Selector values for each filter, each list led by [`ALL`].
pub fn filter_options(df: &DataFrame) -> PolarsResult<FilterOptions> {
    let years = df.column("year")?.i32()?;
    Ok(FilterOptions {
        provinces: with_all(distinct_sorted(df, "province")?),
        sectors: with_all(distinct_sorted(df, "sector")?),
        genders: vec![
            ALL.to_string(),
            Gender::Male.to_string(),
            Gender::Female.to_string(),
        ],
        year_bounds: years.min().zip(years.max()),
    })
}

fn distinct_sorted(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let values = df.column(column)?.str()?;
    let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();
    Ok(distinct.into_iter().map(str::to_string).collect())
}

fn with_all(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub series: String,
    pub mean_daily_wage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub category: String,
    pub mean_daily_wage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderTrendPoint {
    pub gender: String,
    pub year: i32,
    pub mean_daily_wage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorJobMean {
    pub sector: String,
    pub job_category: String,
    pub mean_daily_wage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenderGap {
    pub male_mean: f64,
    pub female_mean: f64,
    /// (male - female) / female, in percent
    pub gap_percent: f64,
}

fn grouped_mean(df: &DataFrame, keys: &[&str]) -> PolarsResult<DataFrame> {
    let key_exprs: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    df.clone()
        .lazy()
        .group_by(key_exprs.clone())
        .agg([col("daily_wage").mean().alias(MEAN_COLUMN)])
        .sort_by_exprs(key_exprs, SortMultipleOptions::default())
        .collect()
}

/// Mean wage per `key`, highest first; ties fall back to key order.
fn ranked_mean(df: &DataFrame, key: &str, limit: Option<usize>) -> PolarsResult<Vec<CategoryMean>> {
    let ranked = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([col("daily_wage").mean().alias(MEAN_COLUMN)])
        .sort_by_exprs(
            vec![col(MEAN_COLUMN), col(key)],
            SortMultipleOptions {
                descending: vec![true, false],
                ..Default::default()
            },
        )
        .collect()?;
    let ranked = match limit {
        Some(limit) => ranked.head(Some(limit)),
        None => ranked,
    };

    let keys = ranked.column(key)?.str()?;
    let means = ranked.column(MEAN_COLUMN)?.f64()?;
    Ok(keys
        .into_iter()
        .zip(means.into_iter())
        .filter_map(|(category, mean)| {
            Some(CategoryMean {
                category: category?.to_string(),
                mean_daily_wage: mean?,
            })
        })
        .collect())
}

/// Mean wage per year, split by province when no province is selected and by sector
/// otherwise.
pub fn yearly_trend(df: &DataFrame, filter: &WageFilter) -> PolarsResult<Vec<TrendPoint>> {
    let series_key = if filter.province.is_all() {
        "province"
    } else {
        "sector"
    };
    let grouped = grouped_mean(df, &["year", series_key])?;
    let years = grouped.column("year")?.i32()?;
    let series = grouped.column(series_key)?.str()?;
    let means = grouped.column(MEAN_COLUMN)?.f64()?;

    let mut points = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        if let (Some(year), Some(name), Some(mean)) = (years.get(idx), series.get(idx), means.get(idx))
        {
            points.push(TrendPoint {
                year,
                series: name.to_string(),
                mean_daily_wage: mean,
            });
        }
    }
    Ok(points)
}

pub fn province_means(df: &DataFrame) -> PolarsResult<Vec<CategoryMean>> {
    ranked_mean(df, "province", None)
}

pub fn top_jobs(df: &DataFrame, limit: usize) -> PolarsResult<Vec<CategoryMean>> {
    ranked_mean(df, "job_category", Some(limit))
}

pub fn gender_trend(df: &DataFrame) -> PolarsResult<Vec<GenderTrendPoint>> {
    let grouped = grouped_mean(df, &["gender", "year"])?;
    let genders = grouped.column("gender")?.str()?;
    let years = grouped.column("year")?.i32()?;
    let means = grouped.column(MEAN_COLUMN)?.f64()?;

    let mut points = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        if let (Some(gender), Some(year), Some(mean)) =
            (genders.get(idx), years.get(idx), means.get(idx))
        {
            points.push(GenderTrendPoint {
                gender: gender.to_string(),
                year,
                mean_daily_wage: mean,
            });
        }
    }
    Ok(points)
}

/// Male and female means over the whole frame; `None` unless both genders are present.
pub fn gender_gap(df: &DataFrame) -> PolarsResult<Option<GenderGap>> {
    let means = ranked_mean(df, "gender", None)?;
    let lookup = |gender: Gender| {
        means
            .iter()
            .find(|entry| entry.category == gender.as_str())
            .map(|entry| entry.mean_daily_wage)
    };

    Ok(match (lookup(Gender::Male), lookup(Gender::Female)) {
        (Some(male_mean), Some(female_mean)) => Some(GenderGap {
            male_mean,
            female_mean,
            gap_percent: (male_mean - female_mean) / female_mean * 100.0,
        }),
        _ => None,
    })
}

pub fn sector_job_means(df: &DataFrame) -> PolarsResult<Vec<SectorJobMean>> {
    let grouped = grouped_mean(df, &["sector", "job_category"])?;
    let sectors = grouped.column("sector")?.str()?;
    let jobs = grouped.column("job_category")?.str()?;
    let means = grouped.column(MEAN_COLUMN)?.f64()?;

    let mut rows = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        if let (Some(sector), Some(job), Some(mean)) = (sectors.get(idx), jobs.get(idx), means.get(idx))
        {
            rows.push(SectorJobMean {
                sector: sector.to_string(),
                job_category: job.to_string(),
                mean_daily_wage: mean,
            });
        }
    }
    Ok(rows)
}

/// Everything the summary view shows for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WageReport {
    pub summary: WageSummary,
    pub yearly_trend: Vec<TrendPoint>,
    pub province_means: Vec<CategoryMean>,
    pub gender_trend: Vec<GenderTrendPoint>,
    pub gender_gap: Option<GenderGap>,
    pub sector_jobs: Vec<SectorJobMean>,
    pub top_jobs: Vec<CategoryMean>,
}

impl WageReport {
    pub fn is_empty(&self) -> bool {
        self.summary.records == 0
    }
}

pub fn build_report(df: &DataFrame, filter: &WageFilter, top_job_limit: usize) -> PolarsResult<WageReport> {
    let filtered = apply_filter(df, filter)?;
    let summary = summarize(&filtered)?;
    if filtered.height() == 0 {
        return Ok(WageReport {
            summary,
            ..WageReport::default()
        });
    }

    Ok(WageReport {
        summary,
        yearly_trend: yearly_trend(&filtered, filter)?,
        province_means: province_means(&filtered)?,
        gender_trend: gender_trend(&filtered)?,
        gender_gap: gender_gap(&filtered)?,
        sector_jobs: sector_job_means(&filtered)?,
        top_jobs: top_jobs(&filtered, top_job_limit)?,
    })
}
