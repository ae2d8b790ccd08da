//! Pivot of per-(artist, year) rows into a dense artist by year grid.

use super::scorer::ScoredAggregate;
use super::validation::YearRange;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Text shown for cells without a measurement.
pub const NO_DATA_MARKER: &str = "Null";

/// Which years become table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum YearColumns {
    /// Only years that have at least one row.
    #[default]
    Observed,
    /// Every year of the requested window, plus any observed year.
    Requested,
}

/// One table cell: a measured average popularity, or nothing measured.
///
/// `NoData` is a placeholder only; it serializes as `null` and is skipped by
/// [`PresentationTable::row_average`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Value(f64),
    NoData,
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::NoData => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{:.2}", v),
            Cell::NoData => f.write_str(NO_DATA_MARKER),
        }
    }
}

/// Dense grid of average popularity, rows = artists and columns = years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationTable {
    pub artists: Vec<String>,
    pub years: Vec<i32>,
    /// `cells[artist_index][year_index]`
    pub cells: Vec<Vec<Cell>>,
}

impl PresentationTable {
    pub fn get(&self, artist_name: &str, year: i32) -> Option<Cell> {
        let row = self.artists.iter().position(|a| a == artist_name)?;
        let column = self.years.iter().position(|y| *y == year)?;
        Some(self.cells[row][column])
    }

    pub fn row(&self, artist_name: &str) -> Option<&[Cell]> {
        let row = self.artists.iter().position(|a| a == artist_name)?;
        Some(&self.cells[row])
    }

    /// Mean of the measured cells of one artist's row; `None` when all are empty.
    pub fn row_average(&self, artist_name: &str) -> Option<f64> {
        let measured: Vec<f64> = self.row(artist_name)?.iter().filter_map(Cell::value).collect();
        if measured.is_empty() {
            None
        } else {
            Some(measured.iter().sum::<f64>() / measured.len() as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// Pivots rows into a [`PresentationTable`] of average popularity.
///
/// Artists keep the order of their first row. Absent (artist, year) pairs
/// and pairs without a measured popularity become [`Cell::NoData`];
/// repeated pairs are averaged over their measured rows.
pub fn to_table(
    rows: &[ScoredAggregate],
    columns: YearColumns,
    range: YearRange,
) -> PresentationTable {
    let mut artists: Vec<String> = Vec::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    let mut sums: HashMap<(&str, i32), (f64, usize)> = HashMap::new();

    for row in rows {
        if !artists.iter().any(|a| a == row.artist_name()) {
            artists.push(row.artist_name().to_string());
        }
        years.insert(row.year());
        if let Some(avg_popularity) = row.aggregate.avg_popularity {
            let entry = sums.entry((row.artist_name(), row.year())).or_insert((0.0, 0));
            entry.0 += avg_popularity;
            entry.1 += 1;
        }
    }

    if columns == YearColumns::Requested {
        years.extend(range.years());
    }
    let years: Vec<i32> = years.into_iter().collect();

    let cells = artists
        .iter()
        .map(|artist| {
            years
                .iter()
                .map(|year| match sums.get(&(artist.as_str(), *year)) {
                    Some((sum, count)) => Cell::Value(sum / *count as f64),
                    None => Cell::NoData,
                })
                .collect()
        })
        .collect();

    PresentationTable {
        artists,
        years,
        cells,
    }
}
