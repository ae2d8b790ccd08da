//! Top artists ranking pipeline.
//!
//! A request runs validate → aggregate → score → select → reshape, once,
//! synchronously. Nothing computed here outlives the returned report.

mod reshape;
mod scorer;
mod selector;
mod series;
mod validation;

pub use reshape::{to_table, Cell, PresentationTable, YearColumns, NO_DATA_MARKER};
pub use scorer::{score, RankWeights, ScoredAggregate};
pub use selector::{rank_artists, select_top, ArtistRankSummary, TopSelection};
pub use series::{chart_series, LineSeries, RankChart, SeriesPoint, AVERAGE_SERIES_LABEL};
pub use validation::{validate, YearRange, MAX_YEAR, MIN_YEAR};

use crate::catalog::{ArtistYearAggregate, SongCatalog};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Caller-side knobs of a ranking request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingConfig {
    pub weights: RankWeights,
    pub top_n: usize,
    pub year_columns: YearColumns,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankWeights::default(),
            top_n: 5,
            year_columns: YearColumns::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error(
        "invalid year range {start_year}-{end_year}: expected {min} <= start <= end <= {max}",
        min = MIN_YEAR,
        max = MAX_YEAR
    )]
    InvalidRange { start_year: i32, end_year: i32 },

    #[error(transparent)]
    DataSource(#[from] anyhow::Error),
}

/// Everything a presenter needs about the selected artists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArtistsReport {
    pub range: YearRange,
    pub config: RankingConfig,
    /// Selected artists, best first.
    pub artists: Vec<ArtistRankSummary>,
    /// All scored rows of the selected artists.
    pub rows: Vec<ScoredAggregate>,
    pub table: PresentationTable,
    pub chart: RankChart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankingOutcome {
    Ranked(TopArtistsReport),
    /// The window is valid but holds no songs with a measured popularity.
    NoData { range: YearRange },
}

/// Grouped (artist, year) rows of the catalog within `range`.
///
/// The rows are re-sorted by artist name and year so the output does not
/// depend on the catalog's own ordering.
pub fn aggregate(
    catalog: &dyn SongCatalog,
    range: YearRange,
) -> Result<Vec<ArtistYearAggregate>, RankingError> {
    let mut rows = catalog.artist_year_aggregates(range.start(), range.end())?;
    rows.sort_by(|a, b| {
        a.artist_name
            .cmp(&b.artist_name)
            .then_with(|| a.year.cmp(&b.year))
    });
    Ok(rows)
}

/// Runs the whole ranking for `[start_year, end_year]`.
///
/// An invalid window is rejected before the catalog is touched.
pub fn top_artists(
    catalog: &dyn SongCatalog,
    start_year: i32,
    end_year: i32,
    config: &RankingConfig,
) -> Result<RankingOutcome, RankingError> {
    let range = YearRange::new(start_year, end_year).ok_or(RankingError::InvalidRange {
        start_year,
        end_year,
    })?;

    let rows = aggregate(catalog, range)?;
    if rows.is_empty() {
        info!("No songs found for the years {}", range);
        return Ok(RankingOutcome::NoData { range });
    }
    debug!("Aggregated {} artist/year rows for {}", rows.len(), range);

    let scored = score(rows, config.weights);
    let selection = select_top(scored, config.top_n);
    if selection.is_empty() && config.top_n > 0 {
        info!("No song with a popularity found for the years {}", range);
        return Ok(RankingOutcome::NoData { range });
    }
    debug!(
        "Selected {} artists ({} rows) with top_n={}",
        selection.artists.len(),
        selection.rows.len(),
        config.top_n
    );

    let table = to_table(&selection.rows, config.year_columns, range);
    let chart = chart_series(&selection.rows);

    Ok(RankingOutcome::Ranked(TopArtistsReport {
        range,
        config: config.clone(),
        artists: selection.artists,
        rows: selection.rows,
        table,
        chart,
    }))
}
