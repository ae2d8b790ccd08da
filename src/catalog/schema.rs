//! SQLite layout of the song catalog.
//!
//! The catalog is produced elsewhere; this description is what the queries
//! in this crate rely on. Real datasets may carry more columns than listed.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, Schema, SqlType, Table};

const ARTIST_TABLE: Table = Table {
    name: "Artist",
    columns: &[
        sqlite_column!("ID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("ArtistName", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_artist_name", "ArtistName")],
};

/// A genre cell may hold a list such as "pop, rock".
const GENRE_TABLE: Table = Table {
    name: "Genre",
    columns: &[
        sqlite_column!("ID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("Genre", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "Artist",
    foreign_column: "ID",
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "Genre",
    foreign_column: "ID",
};

const SONG_TABLE: Table = Table {
    name: "Song",
    columns: &[
        sqlite_column!("ID", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "ArtistID",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("GenreID", &SqlType::Integer, foreign_key = Some(&GENRE_FK)),
        sqlite_column!("Year", &SqlType::Integer, non_null = true),
        sqlite_column!("Popularity", &SqlType::Integer),
        sqlite_column!("Danceability", &SqlType::Real),
        sqlite_column!("Duration", &SqlType::Integer),
    ],
    indices: &[("idx_song_year", "Year"), ("idx_song_artist", "ArtistID")],
};

pub const SONG_CATALOG_SCHEMA: Schema = Schema {
    tables: &[ARTIST_TABLE, GENRE_TABLE, SONG_TABLE],
};
