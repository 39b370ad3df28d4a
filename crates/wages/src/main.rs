use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wages_core::query::{apply_filter, build_report, filter_options, ALL};
use wages_core::{
    load_wage_table, LoadError, LoadErrorKind, LoadedTable, Selection, WageFilter, WagesConfig,
};

mod export;
mod report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Informal sector daily wage reports", long_about = None)]
struct Cli {
    /// Config file (defaults to $WAGES_CONFIG, then ./wages.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Source CSV, overriding the configured path
    #[arg(long, global = true)]
    source: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the normalized wage table, optionally filtered, as CSV, Parquet or JSON
    Export(ExportArgs),
    /// List the values each summary filter accepts
    Options(OptionsArgs),
    /// Print wage metrics and breakdowns for a filter selection
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output file; the extension picks the format. Writes CSV to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    filter: FilterArgs,
    /// Write at most this many of the matching rows
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
struct OptionsArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    #[arg(long, default_value = ALL)]
    province: String,
    #[arg(long, default_value = ALL)]
    sector: String,
    /// First year, inclusive
    #[arg(long)]
    from: Option<i32>,
    /// Last year, inclusive
    #[arg(long)]
    to: Option<i32>,
    /// Male, Female or All
    #[arg(long, default_value = ALL)]
    gender: String,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    filter: FilterArgs,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = WagesConfig::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config = config.with_source_path(source);
    }

    match cli.command {
        Command::Export(args) => handle_export(&config, args),
        Command::Options(args) => handle_options(&config, args),
        Command::Summary(args) => handle_summary(&config, args),
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn load_table(config: &WagesConfig) -> Result<LoadedTable> {
    load_wage_table(config.source_path(), &config.layout).map_err(describe_load_error)
}

fn describe_load_error(err: LoadError) -> anyhow::Error {
    match err.kind() {
        LoadErrorKind::NotFound => anyhow::Error::new(err),
        LoadErrorKind::Malformed => anyhow::Error::new(err)
            .context("the wage report could not be read as the published CSV layout"),
        LoadErrorKind::Other => {
            anyhow::Error::new(err).context("unexpected failure while loading the wage report")
        }
    }
}

fn handle_export(config: &WagesConfig, args: ExportArgs) -> Result<()> {
    let filter = build_filter(&args.filter)?;
    let format = args
        .output
        .as_deref()
        .map(export::ExportFormat::from_path)
        .transpose()?;
    let loaded = load_table(config)?;

    let selected = apply_filter(&loaded.frame, &filter).context("failed to filter wage table")?;
    let matched = selected.height();
    let frame = match args.limit {
        Some(limit) => selected.head(Some(limit)),
        None => selected,
    };
    let observations: Vec<_> = loaded
        .table
        .observations()
        .iter()
        .filter(|observation| filter.matches(observation))
        .take(args.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    match (args.output, format) {
        (Some(path), Some(format)) => {
            export::write_file(&frame, &observations, &path, format)?;
            info!(
                path = %path.display(),
                format = ?format,
                matched,
                rows = frame.height(),
                "Exported wage table"
            );
        }
        _ => {
            export::write_csv(&frame, std::io::stdout().lock())?;
            info!(matched, rows = frame.height(), "Exported wage table to stdout");
        }
    }
    Ok(())
}

fn handle_options(config: &WagesConfig, args: OptionsArgs) -> Result<()> {
    let loaded = load_table(config)?;
    let options = filter_options(&loaded.frame).context("failed to collect filter options")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        println!("{}", report::render_options(&options));
    }
    Ok(())
}

fn handle_summary(config: &WagesConfig, args: SummaryArgs) -> Result<()> {
    let filter = build_filter(&args.filter)?;
    let loaded = load_table(config)?;
    let report = build_report(&loaded.frame, &filter, config.report.top_jobs)
        .context("failed to build wage summary")?;

    if report.is_empty() {
        println!("{}", report::NO_DATA_MESSAGE);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::render_report(&report, &filter));
    }
    Ok(())
}

fn build_filter(args: &FilterArgs) -> Result<WageFilter> {
    let gender = Selection::parse_gender(&args.gender).map_err(anyhow::Error::msg)?;
    let years = match (args.from, args.to) {
        (None, None) => None,
        (from, to) => {
            let from = from.unwrap_or(i32::MIN);
            let to = to.unwrap_or(i32::MAX);
            if from > to {
                bail!("--from ({from}) must not be after --to ({to})");
            }
            Some((from, to))
        }
    };

    Ok(WageFilter {
        province: Selection::parse(&args.province),
        sector: Selection::parse(&args.sector),
        years,
        gender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wages_parser::Gender;

    fn filter_args() -> FilterArgs {
        FilterArgs {
            province: ALL.to_string(),
            sector: ALL.to_string(),
            from: None,
            to: None,
            gender: ALL.to_string(),
        }
    }

    #[test]
    fn default_filter_args_select_everything() {
        let filter = build_filter(&filter_args()).expect("defaults are valid");
        assert_eq!(filter, WageFilter::all());
    }

    #[test]
    fn open_year_bound_is_unbounded_on_that_side() {
        let args = FilterArgs {
            from: Some(2019),
            gender: "female".to_string(),
            province: "Western".to_string(),
            ..filter_args()
        };
        let filter = build_filter(&args).expect("valid filter");
        assert_eq!(filter.years, Some((2019, i32::MAX)));
        assert_eq!(filter.gender, Selection::Only(Gender::Female));
        assert_eq!(filter.province, Selection::Only("Western".to_string()));
    }

    #[test]
    fn reversed_year_range_is_rejected() {
        let args = FilterArgs {
            from: Some(2021),
            to: Some(2019),
            ..filter_args()
        };
        assert!(build_filter(&args).is_err());
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let args = FilterArgs {
            gender: "other".to_string(),
            ..filter_args()
        };
        let err = build_filter(&args).unwrap_err();
        assert!(err.to_string().contains("unknown gender"));
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = describe_load_error(LoadError::NotFound {
            path: PathBuf::from("missing.csv"),
        });
        assert_eq!(err.to_string(), "file not found, expected at missing.csv");
    }

    #[test]
    fn load_table_reads_configured_source() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("wages.csv");
        std::fs::write(
            &path,
            "Province and Sector,2020\nWestern Province,\nPlantation Sector,\nTea,\nMale,500\n",
        )
        .expect("write source");

        let config = WagesConfig::default().with_source_path(&path);
        let loaded = load_table(&config).expect("source loads");
        assert_eq!(loaded.table.len(), 1);

        let missing = WagesConfig::default().with_source_path(dir.path().join("absent.csv"));
        let err = load_table(&missing).unwrap_err();
        assert!(err.to_string().starts_with("file not found, expected at"));
    }

    #[test]
    fn export_accepts_filters_and_limit() {
        let cli = Cli::try_parse_from([
            "wages", "export", "--output", "out.parquet", "--province", "Western", "--from",
            "2019", "--limit", "100",
        ])
        .expect("valid arguments");
        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.output, Some(PathBuf::from("out.parquet")));
                assert_eq!(args.limit, Some(100));
                let filter = build_filter(&args.filter).expect("valid filter");
                assert_eq!(filter, WageFilter::all().with_province("Western").with_years(2019, i32::MAX));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wages",
            "summary",
            "--province",
            "Western",
            "--log-format",
            "pretty",
            "--source",
            "data.csv",
        ])
        .expect("valid arguments");
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert_eq!(cli.source, Some(PathBuf::from("data.csv")));
        match cli.command {
            Command::Summary(args) => assert_eq!(args.filter.province, "Western"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
