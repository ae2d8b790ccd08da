//! Genre breakdowns of the catalog: an artist against the catalog average,
//! and the songs of a single year.
//!
//! Genre cells may list several genres ("pop, rock"). Such rows are split
//! and every listed genre receives the row's values before re-aggregation.

use crate::catalog::SongCatalog;
use crate::ranking::{MAX_YEAR, MIN_YEAR};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum GenreStatsError {
    #[error("artist '{0}' not found in the catalog")]
    UnknownArtist(String),

    #[error("year {0} is outside {min}-{max}", min = MIN_YEAR, max = MAX_YEAR)]
    InvalidYear(i32),

    #[error(transparent)]
    DataSource(#[from] anyhow::Error),
}

/// An artist's mean popularity in one genre next to the catalog-wide mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreComparison {
    pub genre: String,
    pub artist_avg_popularity: f64,
    pub overall_avg_popularity: f64,
    pub above_overall: bool,
}

/// Averages are `None` when no song of the genre has that attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreYearSummary {
    pub genre: String,
    pub avg_danceability: Option<f64>,
    pub avg_duration: Option<f64>,
    pub avg_popularity: Option<f64>,
    pub total_songs: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum YearSummaryOutcome {
    Summary(Vec<GenreYearSummary>),
    NoData { year: i32 },
}

/// Individual genres of a genre cell.
pub fn split_genres(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|g| !g.is_empty())
}

/// Per-genre popularity of `artist_name` compared to the whole catalog.
///
/// Only songs with a positive popularity count. Genres the artist never
/// played report 0 for the artist. Sorted by genre.
pub fn artist_genre_profile(
    catalog: &dyn SongCatalog,
    artist_name: &str,
) -> Result<Vec<GenreComparison>, GenreStatsError> {
    if !catalog.artist_exists(artist_name)? {
        return Err(GenreStatsError::UnknownArtist(artist_name.to_string()));
    }

    let rows = catalog.genre_popularity_for_artist(artist_name)?;
    debug!("Read {} genre cells for artist '{}'", rows.len(), artist_name);

    let mut per_genre: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for row in &rows {
        for genre in split_genres(&row.genre) {
            let entry = per_genre.entry(genre).or_insert((0.0, 0.0, 0));
            entry.0 += row.artist_avg_popularity;
            entry.1 += row.overall_avg_popularity;
            entry.2 += 1;
        }
    }

    Ok(per_genre
        .into_iter()
        .map(|(genre, (artist_sum, overall_sum, count))| {
            let artist_avg_popularity = artist_sum / count as f64;
            let overall_avg_popularity = overall_sum / count as f64;
            GenreComparison {
                genre: genre.to_string(),
                artist_avg_popularity,
                overall_avg_popularity,
                above_overall: artist_avg_popularity > overall_avg_popularity,
            }
        })
        .collect())
}

/// Danceability, duration and popularity averages per genre for one year.
///
/// Averages of split rows are averaged again, skipping unmeasured ones;
/// song totals are summed.
pub fn year_genre_summary(
    catalog: &dyn SongCatalog,
    year: i32,
) -> Result<YearSummaryOutcome, GenreStatsError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(GenreStatsError::InvalidYear(year));
    }

    let rows = catalog.genre_year_rows(year)?;
    if rows.is_empty() {
        info!("No songs found for the year {}", year);
        return Ok(YearSummaryOutcome::NoData { year });
    }

    #[derive(Default)]
    struct Acc {
        danceability: Mean,
        duration: Mean,
        popularity: Mean,
        total_songs: u32,
    }

    let mut per_genre: BTreeMap<&str, Acc> = BTreeMap::new();
    for row in &rows {
        for genre in split_genres(&row.genre) {
            let acc = per_genre.entry(genre).or_default();
            acc.danceability.add(row.avg_danceability);
            acc.duration.add(row.avg_duration);
            acc.popularity.add(row.avg_popularity);
            acc.total_songs += row.total_songs;
        }
    }

    Ok(YearSummaryOutcome::Summary(
        per_genre
            .into_iter()
            .map(|(genre, acc)| GenreYearSummary {
                genre: genre.to_string(),
                avg_danceability: acc.danceability.value(),
                avg_duration: acc.duration.value(),
                avg_popularity: acc.popularity.value(),
                total_songs: acc.total_songs,
            })
            .collect(),
    ))
}

/// Running mean that ignores missing values.
#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}
