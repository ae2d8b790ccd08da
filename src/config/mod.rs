mod file_config;

pub use file_config::{FileConfig, RankingFileConfig};

use crate::ranking::{RankWeights, RankingConfig, YearColumns};
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub catalog_db: Option<PathBuf>,
    pub weight_count: Option<f64>,
    pub weight_popularity: Option<f64>,
    pub top_n: Option<usize>,
    pub year_columns: Option<YearColumns>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_db: PathBuf,
    pub ranking: RankingConfig,
}

impl AppConfig {
    /// Merges CLI arguments with an optional TOML file.
    /// A CLI value wins over the file, the file wins over the defaults.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let ranking_file = file.ranking.unwrap_or_default();
        let defaults = RankingConfig::default();

        let catalog_db = cli
            .catalog_db
            .clone()
            .or_else(|| file.catalog_db.map(PathBuf::from))
            .ok_or_else(|| {
                anyhow!("catalog_db must be specified on the command line or in config file")
            })?;

        let weights = RankWeights::new(
            cli.weight_count
                .or(ranking_file.weight_count)
                .unwrap_or(defaults.weights.count),
            cli.weight_popularity
                .or(ranking_file.weight_popularity)
                .unwrap_or(defaults.weights.popularity),
        );

        let top_n = cli.top_n.or(ranking_file.top_n).unwrap_or(defaults.top_n);
        if top_n == 0 {
            bail!("top_n must be at least 1");
        }

        let year_columns = match (cli.year_columns, ranking_file.year_columns) {
            (Some(columns), _) => columns,
            (None, Some(name)) => parse_year_columns(&name)
                .ok_or_else(|| anyhow!("Unknown year_columns value in config file: {}", name))?,
            (None, None) => defaults.year_columns,
        };

        Ok(Self {
            catalog_db,
            ranking: RankingConfig {
                weights,
                top_n,
                year_columns,
            },
        })
    }
}

/// Resolves `s` against the current directory when it is relative.
/// A path that does not exist yet is kept as given.
pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let resolved = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => path_buf,
        Err(e) => return Err(e).with_context(|| format!("Error resolving path: {}", s)),
    };
    if resolved.is_absolute() {
        return Ok(resolved);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(resolved))
}

/// Uses clap's ValueEnum trait for parsing.
fn parse_year_columns(s: &str) -> Option<YearColumns> {
    YearColumns::from_str(s, true).ok()
}
