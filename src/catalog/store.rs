//! SQLite-backed song catalog.
//!
//! Every query opens its own read-only connection and closes it before
//! returning, whatever the outcome. Nothing is cached between calls.

use super::models::*;
use super::schema::SONG_CATALOG_SCHEMA;
use super::SongCatalog;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

const ARTIST_YEAR_AGGREGATES_SQL: &str = "
    SELECT Artist.ArtistName, Song.Year, COUNT(Song.ID) AS num_songs, AVG(Song.Popularity) AS avg_popularity
    FROM Song
    JOIN Artist ON Song.ArtistID = Artist.ID
    WHERE Song.Year BETWEEN ?1 AND ?2
    GROUP BY Artist.ArtistName, Song.Year
    ORDER BY Artist.ArtistName, Song.Year";

const GENRE_POPULARITY_FOR_ARTIST_SQL: &str = "
    WITH ArtistGenres AS (
        SELECT Genre.Genre AS Genre,
               AVG(CAST(Song.Popularity AS FLOAT)) AS avg_popularity_artist
        FROM Genre
        JOIN Song ON Song.GenreID = Genre.ID
        JOIN Artist ON Song.ArtistID = Artist.ID
        WHERE Artist.ArtistName = ?1
          AND Song.Popularity IS NOT NULL
          AND Song.Popularity > 0
        GROUP BY Genre.Genre
    ),
    OverallGenres AS (
        SELECT Genre.Genre AS Genre,
               AVG(CAST(Song.Popularity AS FLOAT)) AS avg_popularity_overall
        FROM Genre
        JOIN Song ON Song.GenreID = Genre.ID
        WHERE Song.Popularity IS NOT NULL
          AND Song.Popularity > 0
        GROUP BY Genre.Genre
    )
    SELECT og.Genre,
           COALESCE(ag.avg_popularity_artist, 0) AS avg_popularity_artist,
           og.avg_popularity_overall
    FROM OverallGenres og
    LEFT JOIN ArtistGenres ag ON og.Genre = ag.Genre
    ORDER BY og.Genre";

const GENRE_YEAR_ROWS_SQL: &str = "
    SELECT Genre.Genre,
           AVG(Song.Danceability) AS avg_danceability,
           AVG(Song.Duration) AS avg_duration,
           AVG(Song.Popularity) AS avg_popularity,
           COUNT(Song.ID) AS total_songs
    FROM Genre
    JOIN Song ON Genre.ID = Song.GenreID
    WHERE Song.Year = ?1
    GROUP BY Genre.Genre
    ORDER BY Genre.Genre";

/// SQLite song catalog opened from a database file.
#[derive(Debug, Clone)]
pub struct SqliteSongCatalog {
    db_path: PathBuf,
    open_connections: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub artists: usize,
    pub songs: usize,
}

/// A connection that is closed, and accounted for, when dropped.
struct ScopedConnection {
    conn: Connection,
    open_connections: Arc<AtomicUsize>,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        let remaining = self.open_connections.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("Released catalog connection ({} still open)", remaining);
    }
}

impl SqliteSongCatalog {
    /// Open an existing catalog and check it has the columns the queries need.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.exists() {
            bail!("Catalog database does not exist: {:?}", db_path);
        }

        let catalog = SqliteSongCatalog {
            db_path: db_path.to_path_buf(),
            open_connections: Arc::new(AtomicUsize::new(0)),
        };

        let conn = catalog.connect()?;
        SONG_CATALOG_SCHEMA
            .validate(&conn)
            .with_context(|| format!("Catalog schema validation failed for {:?}", db_path))?;

        drop(conn);

        let counts = catalog.counts()?;
        info!(
            "Opened song catalog {:?}: {} artists, {} songs",
            db_path, counts.artists, counts.songs
        );
        Ok(catalog)
    }

    pub fn counts(&self) -> Result<CatalogCounts> {
        let conn = self.connect()?;
        let artists: i64 = conn.query_row("SELECT COUNT(*) FROM Artist", [], |r| r.get(0))?;
        let songs: i64 = conn.query_row("SELECT COUNT(*) FROM Song", [], |r| r.get(0))?;
        Ok(CatalogCounts {
            artists: artists as usize,
            songs: songs as usize,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Number of connections currently held by in-flight queries.
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    fn connect(&self) -> Result<ScopedConnection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {:?}", self.db_path))?;

        let open = self.open_connections.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Acquired catalog connection ({} open)", open);

        Ok(ScopedConnection {
            conn,
            open_connections: Arc::clone(&self.open_connections),
        })
    }
}

impl SongCatalog for SqliteSongCatalog {
    fn artist_year_aggregates(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<ArtistYearAggregate>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(ARTIST_YEAR_AGGREGATES_SQL)
            .context("Failed to prepare artist aggregate query")?;

        let rows = stmt
            .query_map(params![start_year, end_year], |row| {
                Ok(ArtistYearAggregate {
                    artist_name: row.get(0)?,
                    year: row.get(1)?,
                    song_count: row.get(2)?,
                    avg_popularity: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read artist aggregate rows")?;

        debug!(
            "Aggregated {} artist/year rows for {}-{}",
            rows.len(),
            start_year,
            end_year
        );
        Ok(rows)
    }

    fn artist_exists(&self, artist_name: &str) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM Artist WHERE Artist.ArtistName = ?1",
            params![artist_name],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    fn first_artist_name(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        let name = conn
            .query_row("SELECT ArtistName FROM Artist LIMIT 1", [], |r| r.get(0))
            .optional()?;
        Ok(name)
    }

    fn genre_popularity_for_artist(&self, artist_name: &str) -> Result<Vec<GenrePopularityRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(GENRE_POPULARITY_FOR_ARTIST_SQL)?;
        let rows = stmt
            .query_map(params![artist_name], |row| {
                Ok(GenrePopularityRow {
                    genre: row.get(0)?,
                    artist_avg_popularity: row.get(1)?,
                    overall_avg_popularity: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn genre_year_rows(&self, year: i32) -> Result<Vec<GenreYearRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(GENRE_YEAR_ROWS_SQL)?;
        let rows = stmt
            .query_map(params![year], |row| {
                Ok(GenreYearRow {
                    genre: row.get(0)?,
                    avg_danceability: row.get(1)?,
                    avg_duration: row.get(2)?,
                    avg_popularity: row.get(3)?,
                    total_songs: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
