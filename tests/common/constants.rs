#![allow(dead_code)]

pub const ARTIST_ALPHA: &str = "Alpha";
pub const ARTIST_BETA: &str = "Beta";
pub const ARTIST_GAMMA: &str = "Gamma Ray";

pub const GENRE_POP: &str = "pop";
pub const GENRE_ROCK_METAL: &str = "rock, metal";

/// Alpha: 3 songs in 1999 (avg 50) and 5 in 2000 (avg 70).
/// Beta: 1 song in 1999 (popularity 90).
/// Gamma Ray: 2 songs in 2015 (avg 15).
pub const TOTAL_SONGS: usize = 11;
pub const TOTAL_ARTISTS: usize = 3;

/// Years inside the valid window that hold no songs.
pub const EMPTY_START_YEAR: i32 = 2005;
pub const EMPTY_END_YEAR: i32 = 2010;
