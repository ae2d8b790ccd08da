use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

use top_artists::cli_style::{self, get_styles, CommandHelp};
use top_artists::config::parse_path;
use top_artists::genre_stats::{self, GenreStatsError, YearSummaryOutcome};
use top_artists::presenter::{self, INVALID_RANGE_MESSAGE};
use top_artists::ranking::{MAX_YEAR, MIN_YEAR};
use top_artists::{
    top_artists, AppConfig, CliConfig, FileConfig, RankingConfig, RankingError, RankingOutcome,
    SongCatalog, SqliteSongCatalog,
};

/// Interactive explorer of a song catalog.
#[derive(Parser, Debug)]
#[command(styles = get_styles(), version)]
struct CliArgs {
    #[clap(value_parser = parse_path)]
    pub catalog_db: Option<PathBuf>,

    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
#[command(styles = get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Ranks the top artists between two years.
    Top {
        start_year: i32,
        end_year: i32,
        /// Overrides the configured number of artists for this query.
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Compares an artist's genre popularity with the whole catalog.
    Artist {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Shows per-genre statistics of a single year.
    Year { year: i32 },

    /// Shows the active configuration.
    Config,

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "top",
        args: "<start> <end> [--top-n N]",
        description: "Rank artists over a year range",
    },
    CommandHelp {
        name: "artist",
        args: "<name>",
        description: "Genre popularity of an artist vs the catalog",
    },
    CommandHelp {
        name: "year",
        args: "<year>",
        description: "Genre statistics of one year",
    },
    CommandHelp {
        name: "config",
        args: "",
        description: "Show the active configuration",
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
    },
];

struct Session {
    catalog: SqliteSongCatalog,
    config: AppConfig,
}

impl Session {
    fn top(&self, start_year: i32, end_year: i32, top_n: Option<usize>) -> CommandExecutionResult {
        let ranking = match top_n {
            Some(0) => return CommandExecutionResult::Error("--top-n must be at least 1".into()),
            Some(n) => RankingConfig {
                top_n: n,
                ..self.config.ranking.clone()
            },
            None => self.config.ranking.clone(),
        };

        match top_artists(&self.catalog, start_year, end_year, &ranking) {
            Ok(RankingOutcome::Ranked(report)) => presenter::print_report(&report),
            Ok(RankingOutcome::NoData { range }) => {
                cli_style::print_warning(&presenter::no_data_message(range))
            }
            Err(RankingError::InvalidRange { .. }) => cli_style::print_error(INVALID_RANGE_MESSAGE),
            Err(e) => return CommandExecutionResult::Error(format!("{:#}", e)),
        }
        CommandExecutionResult::Ok
    }

    fn artist(&self, artist_name: &str) -> CommandExecutionResult {
        match genre_stats::artist_genre_profile(&self.catalog, artist_name) {
            Ok(profile) => presenter::print_genre_profile(artist_name, &profile),
            Err(GenreStatsError::UnknownArtist(name)) => {
                cli_style::print_error(&format!("Artist '{}' not found.", name));
                if let Ok(Some(example)) = self.catalog.first_artist_name() {
                    cli_style::print_info(&format!("Try for example: artist {}", example));
                }
            }
            Err(e) => return CommandExecutionResult::Error(format!("{:#}", e)),
        }
        CommandExecutionResult::Ok
    }

    fn year(&self, year: i32) -> CommandExecutionResult {
        match genre_stats::year_genre_summary(&self.catalog, year) {
            Ok(YearSummaryOutcome::Summary(summary)) => presenter::print_year_summary(year, &summary),
            Ok(YearSummaryOutcome::NoData { year }) => {
                cli_style::print_warning(&format!("No data found for the year {}.", year))
            }
            Err(GenreStatsError::InvalidYear(_)) => cli_style::print_error(&format!(
                "Invalid input. Please enter a year between {} and {}.",
                MIN_YEAR, MAX_YEAR
            )),
            Err(e) => return CommandExecutionResult::Error(format!("{:#}", e)),
        }
        CommandExecutionResult::Ok
    }

    fn show_config(&self) {
        let ranking = &self.config.ranking;
        cli_style::print_section_header("Configuration");
        cli_style::print_key_value("Catalog", &self.config.catalog_db.display().to_string());
        cli_style::print_key_value("Weight (count)", &ranking.weights.count.to_string());
        cli_style::print_key_value(
            "Weight (popularity)",
            &ranking.weights.popularity.to_string(),
        );
        cli_style::print_key_value("Top N", &ranking.top_n.to_string());
        cli_style::print_key_value("Year columns", &format!("{:?}", ranking.year_columns));
        cli_style::print_key_value(
            "Open connections",
            &self.catalog.open_connections().to_string(),
        );
        cli_style::print_section_footer();
    }
}

fn execute_command(line: String, session: &Session) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::Top {
                start_year,
                end_year,
                top_n,
            } => session.top(start_year, end_year, top_n),
            InnerCommand::Artist { name } => session.artist(&name.join(" ")),
            InnerCommand::Year { year } => session.year(year),
            InnerCommand::Config => {
                session.show_config();
                CommandExecutionResult::Ok
            }
            InnerCommand::Help => {
                cli_style::print_help(COMMANDS);
                CommandExecutionResult::Ok
            }
            InnerCommand::Exit => CommandExecutionResult::Exit,
        },
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            CommandExecutionResult::Ok
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct CommandHelper {
    commands_names: Vec<String>,
}

impl CommandHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        CommandHelper { commands_names }
    }
}

impl Completer for CommandHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::new()));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect();

        Ok((0, matches))
    }
}

impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}
impl Helper for CommandHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        catalog_db: cli_args.catalog_db.clone(),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    let catalog = SqliteSongCatalog::open(&config.catalog_db)?;
    let counts = catalog.counts()?;
    let session = Session { catalog, config };

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<CommandHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(CommandHelper::new()));

    cli_style::print_welcome(
        &session.config.catalog_db.display().to_string(),
        counts.artists,
        counts.songs,
    );

    let prompt = cli_style::get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &session) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&format!("Error: {}", err));
                    }
                }
                cli_style::flush();
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("Error: {:?}", e));
                break;
            }
        }
    }

    cli_style::print_goodbye();
    Ok(())
}
