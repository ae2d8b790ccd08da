mod models;
mod schema;
mod store;

pub use models::*;
pub use schema::SONG_CATALOG_SCHEMA;
pub use store::{CatalogCounts, SqliteSongCatalog};

use anyhow::Result;

/// Read-only access to a song catalog.
///
/// Implementations run each call as one self-contained query; no state is
/// carried between calls.
pub trait SongCatalog {
    /// Songs with year in `[start_year, end_year]`, grouped by (artist name, year).
    ///
    /// Rows come back ordered by artist name, then year. An empty vector means
    /// no song matched the window.
    fn artist_year_aggregates(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<ArtistYearAggregate>>;

    fn artist_exists(&self, artist_name: &str) -> Result<bool>;

    /// Name of the first artist in storage order, if any.
    fn first_artist_name(&self) -> Result<Option<String>>;

    /// Artist vs catalog mean popularity for every genre cell that has rated songs.
    fn genre_popularity_for_artist(&self, artist_name: &str) -> Result<Vec<GenrePopularityRow>>;

    /// Per-genre-cell statistics of the songs released in `year`.
    fn genre_year_rows(&self, year: i32) -> Result<Vec<GenreYearRow>>;
}
