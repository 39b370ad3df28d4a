use csv::StringRecord;
use tracing::{info, warn};

use crate::classifier::{classify_label, ClassifierState, RowKind};
use crate::cleaner::clean_wage_cell;
use crate::errors::ParserError;
use crate::layout::ReportLayout;
use crate::model::{ParseStats, RawRow, WageObservation, WageTable};

/// A year column and its position in the source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YearColumn {
    index: usize,
    year: i32,
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

/// Parses the raw report into the normalized long table.
///
/// The whole input is read before classification starts, so a framing error anywhere
/// fails the parse without producing a partial table.
pub fn parse_wage_report(content: &str, layout: &ReportLayout) -> Result<WageTable, ParserError> {
    let mut reader = reader_builder().from_reader(content.as_bytes());
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or(ParserError::MissingHeader)?
        .map_err(|source| ParserError::Csv {
            line_index: 1,
            source,
        })?;
    let year_columns = parse_year_columns(&header)?;

    let rows = records
        .enumerate()
        .map(|(row_idx, record)| {
            let record = record.map_err(|source| ParserError::Csv {
                line_index: row_idx + 2,
                source,
            })?;
            Ok(raw_row(&record, &year_columns))
        })
        .collect::<Result<Vec<RawRow>, ParserError>>()?;

    let years: Vec<i32> = year_columns.iter().map(|column| column.year).collect();
    let (observations, stats) = reshape_rows(rows, &years, layout);

    info!(
        rows_read = stats.rows_read,
        blank_rows = stats.blank_rows,
        header_rows = stats.header_rows,
        leaf_rows = stats.leaf_rows,
        observations = stats.observations,
        cells_dropped = stats.cells_dropped,
        "Parsed wage report"
    );

    Ok(WageTable::new(years, observations, stats))
}

/// Like [`parse_wage_report`], for input that has not been checked for UTF-8 yet.
pub fn parse_wage_report_bytes(
    bytes: &[u8],
    layout: &ReportLayout,
) -> Result<WageTable, ParserError> {
    let content = std::str::from_utf8(bytes)?;
    parse_wage_report(content, layout)
}

/// Folds the ordered rows through the classifier.
///
/// Each row yields zero or more observations, in row order and then year-column order.
pub fn reshape_rows<I>(
    rows: I,
    years: &[i32],
    layout: &ReportLayout,
) -> (Vec<WageObservation>, ParseStats)
where
    I: IntoIterator<Item = RawRow>,
{
    let (_, observations, stats) = rows.into_iter().fold(
        (ClassifierState::default(), Vec::new(), ParseStats::default()),
        |(state, mut observations, mut stats), row| {
            stats.rows_read += 1;
            let kind = classify_label(&row.label, layout);
            if kind.is_header() {
                stats.header_rows += 1;
            }
            if kind == RowKind::Blank {
                stats.blank_rows += 1;
            }

            let (state, leaf) = state.advance(kind);
            if let Some(leaf) = leaf {
                stats.leaf_rows += 1;
                let emitted = leaf.observations(years, &row.cells);
                stats.cells_dropped += years.len() - emitted.len();
                stats.observations += emitted.len();
                observations.extend(emitted);
            }

            (state, observations, stats)
        },
    );
    (observations, stats)
}

fn parse_year_columns(header: &StringRecord) -> Result<Vec<YearColumn>, ParserError> {
    let mut columns = Vec::new();
    for (index, value) in header.iter().enumerate().skip(1) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            warn!(column_index = index, "ignoring column with empty header");
            continue;
        }
        let year = trimmed
            .parse::<i32>()
            .map_err(|err| ParserError::InvalidHeader {
                column_index: index,
                message: format!("year label '{trimmed}' is not an integer: {err}"),
            })?;
        columns.push(YearColumn { index, year });
    }

    if columns.is_empty() {
        return Err(ParserError::NoYearColumns);
    }
    Ok(columns)
}

fn raw_row(record: &StringRecord, year_columns: &[YearColumn]) -> RawRow {
    let label = record.get(0).unwrap_or_default();
    let cells = year_columns
        .iter()
        .map(|column| clean_wage_cell(record.get(column.index).unwrap_or_default()))
        .collect();
    RawRow::new(label, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::CleanedWage;
    use crate::model::Gender;

    fn row(label: &str, cells: &[Option<f64>]) -> RawRow {
        RawRow::new(
            label,
            cells
                .iter()
                .map(|cell| match cell {
                    Some(value) => CleanedWage::Value(*value),
                    None => CleanedWage::Missing,
                })
                .collect(),
        )
    }

    #[test]
    fn reshapes_gender_rows_under_job_marker() {
        let rows = vec![
            row("Western Province", &[None]),
            row("Plantation Sector", &[None]),
            row("Tea", &[None]),
            row("Male", &[Some(500.0)]),
            row("Femal", &[Some(400.0)]),
        ];
        let (observations, stats) = reshape_rows(rows, &[2020], &ReportLayout::default());

        assert_eq!(observations.len(), 2);
        assert_eq!(
            observations[0],
            WageObservation {
                province: "Western".to_string(),
                sector: "Plantation".to_string(),
                job_category: "Tea".to_string(),
                gender: Gender::Male,
                year: 2020,
                daily_wage: 500.0,
            }
        );
        assert_eq!(
            observations[1],
            WageObservation {
                province: "Western".to_string(),
                sector: "Plantation".to_string(),
                job_category: "Tea".to_string(),
                gender: Gender::Female,
                year: 2020,
                daily_wage: 400.0,
            }
        );
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.header_rows, 3);
        assert_eq!(stats.leaf_rows, 2);
    }

    #[test]
    fn header_rows_with_values_emit_nothing() {
        let rows = vec![
            row("Central Province", &[Some(1010.0), Some(1080.0)]),
            row("Plantation Sector", &[Some(990.0), Some(1040.0)]),
            row("Rubber", &[Some(1.0), Some(2.0)]),
        ];
        let (observations, stats) = reshape_rows(rows, &[2019, 2020], &ReportLayout::default());
        assert!(observations.is_empty());
        assert_eq!(stats.header_rows, 3);
    }

    #[test]
    fn blank_rows_do_not_reset_context() {
        let rows = vec![
            row("Uva Province", &[None]),
            row("Agriculture Sector", &[None]),
            row("Paddy", &[None]),
            row("", &[Some(10.0)]),
            row("nan", &[Some(10.0)]),
            row("Male", &[Some(905.0)]),
        ];
        let (observations, stats) = reshape_rows(rows, &[2021], &ReportLayout::default());
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].province, "Uva");
        assert_eq!(observations[0].sector, "Agriculture");
        assert_eq!(observations[0].job_category, "Paddy");
        assert_eq!(stats.blank_rows, 2);
    }

    #[test]
    fn leaves_before_first_province_are_dropped() {
        let rows = vec![
            row("Average daily wage", &[Some(1000.0)]),
            row("Southern Province", &[None]),
            row("Helper", &[Some(1100.0)]),
        ];
        let (observations, stats) = reshape_rows(rows, &[2020], &ReportLayout::default());
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].province, "Southern");
        assert_eq!(observations[0].sector, "");
        assert_eq!(stats.cells_dropped, 1);
    }

    #[test]
    fn year_header_must_be_integer() {
        let err = parse_wage_report("Province and Sector,2020,Total\n", &ReportLayout::default())
            .expect_err("non-integer year should fail");
        match err {
            ParserError::InvalidHeader { column_index, .. } => assert_eq!(column_index, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_without_years_is_rejected() {
        let err = parse_wage_report("Province and Sector\nWestern Province\n", &ReportLayout::default())
            .expect_err("missing years should fail");
        assert!(matches!(err, ParserError::NoYearColumns));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = parse_wage_report("", &ReportLayout::default()).expect_err("empty input");
        assert!(matches!(err, ParserError::MissingHeader));
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let err = parse_wage_report_bytes(&[0x50, 0xff, 0xfe], &ReportLayout::default())
            .expect_err("invalid utf-8");
        assert!(matches!(err, ParserError::Encoding(_)));
    }

    #[test]
    fn ragged_rows_treat_absent_cells_as_missing() {
        let content = "Province and Sector,2019,2020,2021\n\
                       Sabaragamuwa Province\n\
                       Plantation Sector\n\
                       Rubber\n\
                       Male,880\n";
        let table = parse_wage_report(content, &ReportLayout::default()).expect("parse");
        assert_eq!(table.len(), 1);
        assert_eq!(table.observations()[0].year, 2019);
        assert_eq!(table.years(), &[2019, 2020, 2021]);
    }

    #[test]
    fn empty_header_columns_are_ignored() {
        let content = "Province and Sector,2020,,2021\n\
                       Western Province,,,\n\
                       Helper,1000,999,1100\n";
        let table = parse_wage_report(content, &ReportLayout::default()).expect("parse");
        let wages: Vec<f64> = table.observations().iter().map(|o| o.daily_wage).collect();
        assert_eq!(wages, vec![1000.0, 1100.0]);
    }
}
