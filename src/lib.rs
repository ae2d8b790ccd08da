//! Top Artists Library
//!
//! Ranks artists of a song catalog over a year range and reshapes the
//! result for tabular and chart presentation. The binaries in this crate
//! are thin front-ends over these modules.

pub mod catalog;
pub mod cli_style;
pub mod config;
pub mod genre_stats;
pub mod presenter;
pub mod ranking;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::{SongCatalog, SqliteSongCatalog};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use ranking::{
    top_artists, validate, RankWeights, RankingConfig, RankingError, RankingOutcome,
    TopArtistsReport, YearColumns, YearRange,
};
