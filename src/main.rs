use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use top_artists::cli_style::{self, get_styles};
use top_artists::config::parse_path;
use top_artists::presenter::{self, INVALID_RANGE_MESSAGE};
use top_artists::ranking::{MAX_YEAR, MIN_YEAR};
use top_artists::{
    top_artists, AppConfig, CliConfig, FileConfig, RankingError, RankingOutcome,
    SqliteSongCatalog, YearColumns,
};

/// Ranks the artists of a song catalog over a range of years.
#[derive(Parser, Debug)]
#[command(styles = get_styles(), version)]
struct CliArgs {
    /// Path to the SQLite song catalog. May also be set in the config file.
    #[clap(value_parser = parse_path)]
    pub catalog_db: Option<PathBuf>,

    /// First year of the window. Prompted for when missing.
    #[clap(long)]
    pub start_year: Option<i32>,

    /// Last year of the window. Prompted for when missing.
    #[clap(long)]
    pub end_year: Option<i32>,

    /// Number of artists to keep.
    #[clap(long)]
    pub top_n: Option<usize>,

    /// Weight of the yearly song count in the rank value.
    #[clap(long, allow_hyphen_values = true)]
    pub weight_count: Option<f64>,

    /// Weight of the yearly average popularity in the rank value.
    #[clap(long, allow_hyphen_values = true)]
    pub weight_popularity: Option<f64>,

    /// Which years become table columns.
    #[clap(long, value_enum)]
    pub year_columns: Option<YearColumns>,

    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON instead of a table and chart.
    #[clap(long)]
    pub json: bool,
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            catalog_db: self.catalog_db.clone(),
            weight_count: self.weight_count,
            weight_popularity: self.weight_popularity,
            top_n: self.top_n,
            year_columns: self.year_columns,
        }
    }
}

/// Reads one year from the terminal. `None` when the answer is not a number.
fn prompt_year(editor: &mut DefaultEditor, which: &str) -> Result<Option<i32>> {
    let prompt = format!("Enter the {} year ({}-{}): ", which, MIN_YEAR, MAX_YEAR);
    match editor.readline(&prompt) {
        Ok(line) => Ok(line.trim().parse().ok()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e).context("Failed to read year from terminal"),
    }
}

fn resolve_years(cli_args: &CliArgs) -> Result<Option<(i32, i32)>> {
    if let (Some(start), Some(end)) = (cli_args.start_year, cli_args.end_year) {
        return Ok(Some((start, end)));
    }

    let mut editor = DefaultEditor::new()?;
    let start = match cli_args.start_year {
        Some(year) => Some(year),
        None => prompt_year(&mut editor, "start")?,
    };
    let end = match (start, cli_args.end_year) {
        (None, _) => None,
        (Some(_), Some(year)) => Some(year),
        (Some(_), None) => prompt_year(&mut editor, "end")?,
    };
    Ok(start.zip(end))
}

fn main() -> Result<ExitCode> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;
    info!("Resolved configuration: {:?}", app_config);

    let catalog = SqliteSongCatalog::open(&app_config.catalog_db)?;

    let Some((start_year, end_year)) = resolve_years(&cli_args)? else {
        cli_style::print_error(INVALID_RANGE_MESSAGE);
        return Ok(ExitCode::FAILURE);
    };

    match top_artists(&catalog, start_year, end_year, &app_config.ranking) {
        Ok(RankingOutcome::Ranked(report)) => {
            if cli_args.json {
                println!("{}", presenter::render_json(&report)?);
            } else {
                presenter::print_report(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(RankingOutcome::NoData { range }) => {
            if cli_args.json {
                let empty = serde_json::json!({ "range": range, "artists": [] });
                println!("{}", presenter::render_json(&empty)?);
            } else {
                cli_style::print_warning(&presenter::no_data_message(range));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(RankingError::InvalidRange { .. }) => {
            cli_style::print_error(INVALID_RANGE_MESSAGE);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Ranking failed"),
    }
}
