//! Temporary SQLite catalogs for end-to-end tests.

use super::constants::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;
use top_artists::catalog::SONG_CATALOG_SCHEMA;
use top_artists::SqliteSongCatalog;

/// (artist id, genre id, year, popularity, danceability, duration)
type SongRow = (i64, i64, i32, Option<i64>, f64, i64);

const SONGS: &[SongRow] = &[
    (1, 1, 1999, Some(40), 0.5, 200_000),
    (1, 1, 1999, Some(50), 0.6, 210_000),
    (1, 2, 1999, Some(60), 0.7, 220_000),
    (1, 1, 2000, Some(60), 0.5, 190_000),
    (1, 2, 2000, Some(65), 0.5, 195_000),
    (1, 1, 2000, Some(70), 0.6, 200_000),
    (1, 2, 2000, Some(75), 0.6, 205_000),
    (1, 1, 2000, Some(80), 0.7, 210_000),
    (2, 2, 1999, Some(90), 0.8, 180_000),
    (3, 1, 2015, Some(10), 0.3, 240_000),
    (3, 1, 2015, Some(20), 0.4, 260_000),
];

pub struct TestCatalog {
    pub catalog: SqliteSongCatalog,
    pub db_path: PathBuf,
    pub temp_dir: TempDir,
}

impl TestCatalog {
    /// Catalog with the three artists described in `constants`.
    pub fn spawn() -> Self {
        Self::with_songs(SONGS).expect("Failed to create test catalog")
    }

    /// Catalog with the fixture artists and genres but no songs.
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self::with_songs(&[]).expect("Failed to create empty test catalog")
    }

    fn with_songs(songs: &[SongRow]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("CWDatabase.db");

        let conn = Connection::open(&db_path)?;
        SONG_CATALOG_SCHEMA.create(&conn)?;

        for (id, name) in [(1, ARTIST_ALPHA), (2, ARTIST_BETA), (3, ARTIST_GAMMA)] {
            conn.execute(
                "INSERT INTO Artist (ID, ArtistName) VALUES (?1, ?2)",
                params![id, name],
            )?;
        }
        for (id, genre) in [(1, GENRE_POP), (2, GENRE_ROCK_METAL)] {
            conn.execute(
                "INSERT INTO Genre (ID, Genre) VALUES (?1, ?2)",
                params![id, genre],
            )?;
        }
        for (artist_id, genre_id, year, popularity, danceability, duration) in songs {
            conn.execute(
                "INSERT INTO Song (ArtistID, GenreID, Year, Popularity, Danceability, Duration)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![artist_id, genre_id, year, popularity, danceability, duration],
            )?;
        }
        drop(conn);

        let catalog = SqliteSongCatalog::open(&db_path)?;
        Ok(Self {
            catalog,
            db_path,
            temp_dir,
        })
    }

    /// Runs raw SQL against the catalog file, outside the read-only store.
    #[allow(dead_code)]
    pub fn execute(&self, sql: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}
