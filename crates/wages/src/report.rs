use std::fmt::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use wages_core::query::{FilterOptions, WageFilter, WageReport};

pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

pub fn format_rupees(value: f64) -> String {
    format!("Rs. {:.0}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_rupees).unwrap_or_else(|| "-".to_string())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn align_last_right(table: &mut Table) {
    let last = table.column_count().saturating_sub(1);
    if let Some(column) = table.column_mut(last) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

pub fn render_report(report: &WageReport, filter: &WageFilter) -> String {
    let mut out = String::new();

    let mut overview = new_table(&["Records", "Average", "Lowest", "Highest"]);
    overview.add_row(vec![
        report.summary.records.to_string(),
        format_optional(report.summary.mean),
        format_optional(report.summary.min),
        format_optional(report.summary.max),
    ]);
    section(&mut out, "Overview", &overview);

    let series_label = if filter.province.is_all() {
        "Province"
    } else {
        "Sector"
    };
    let mut trend = new_table(&["Year", series_label, "Mean daily wage"]);
    for point in &report.yearly_trend {
        trend.add_row(vec![
            point.year.to_string(),
            point.series.clone(),
            format_rupees(point.mean_daily_wage),
        ]);
    }
    align_last_right(&mut trend);
    section(&mut out, "Yearly trend", &trend);

    let mut provinces = new_table(&["Province", "Mean daily wage"]);
    for entry in &report.province_means {
        provinces.add_row(vec![
            entry.category.clone(),
            format_rupees(entry.mean_daily_wage),
        ]);
    }
    align_last_right(&mut provinces);
    section(&mut out, "Average wage by province", &provinces);

    let mut genders = new_table(&["Gender", "Year", "Mean daily wage"]);
    for point in &report.gender_trend {
        genders.add_row(vec![
            point.gender.clone(),
            point.year.to_string(),
            format_rupees(point.mean_daily_wage),
        ]);
    }
    align_last_right(&mut genders);
    section(&mut out, "Gender trend", &genders);

    if let Some(gap) = report.gender_gap {
        let _ = writeln!(
            out,
            "Gender gap: male {} vs female {} ({:+.1}%)\n",
            format_rupees(gap.male_mean),
            format_rupees(gap.female_mean),
            gap.gap_percent
        );
    }

    let mut jobs = new_table(&["Sector", "Job category", "Mean daily wage"]);
    for row in &report.sector_jobs {
        jobs.add_row(vec![
            row.sector.clone(),
            row.job_category.clone(),
            format_rupees(row.mean_daily_wage),
        ]);
    }
    align_last_right(&mut jobs);
    section(&mut out, "Sector and job breakdown", &jobs);

    let mut top = new_table(&["Rank", "Job category", "Mean daily wage"]);
    for (rank, entry) in report.top_jobs.iter().enumerate() {
        top.add_row(vec![
            (rank + 1).to_string(),
            entry.category.clone(),
            format_rupees(entry.mean_daily_wage),
        ]);
    }
    align_last_right(&mut top);
    section(&mut out, "Top paying jobs", &top);

    out.trim_end().to_string()
}

pub fn render_options(options: &FilterOptions) -> String {
    let mut table = new_table(&["Filter", "Values"]);
    table.add_row(vec!["Province".to_string(), options.provinces.join(", ")]);
    table.add_row(vec!["Sector".to_string(), options.sectors.join(", ")]);
    table.add_row(vec!["Gender".to_string(), options.genders.join(", ")]);
    let years = match options.year_bounds {
        Some((first, last)) => format!("{first} - {last}"),
        None => "-".to_string(),
    };
    table.add_row(vec!["Years".to_string(), years]);
    table.to_string()
}

fn section(out: &mut String, title: &str, table: &Table) {
    let _ = writeln!(out, "{title}\n{table}\n");
}
