//! Row types read from the song catalog.

use serde::Serialize;

/// Song count and mean popularity of one artist in one year.
///
/// Produced by grouping the catalog's songs by (artist name, year). Pairs
/// without songs in the queried window have no row at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistYearAggregate {
    pub artist_name: String,
    pub year: i32,
    pub song_count: u32,
    /// `None` when no song of the group carries a popularity.
    pub avg_popularity: Option<f64>,
}

/// Mean popularity of one genre cell, for one artist and for the whole catalog.
///
/// `genre` is the raw cell value and may hold several comma separated genres.
/// `artist_avg_popularity` is 0 when the artist has no songs in that genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenrePopularityRow {
    pub genre: String,
    pub artist_avg_popularity: f64,
    pub overall_avg_popularity: f64,
}

/// Per-genre song statistics for a single year, as stored (genre cell not split).
///
/// An average is `None` when no song of the cell has that attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreYearRow {
    pub genre: String,
    pub avg_danceability: Option<f64>,
    pub avg_duration: Option<f64>,
    pub avg_popularity: Option<f64>,
    pub total_songs: u32,
}
