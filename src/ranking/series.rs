//! Line series of rank values, grouped by artist, for chart rendering.

use super::scorer::ScoredAggregate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub rank_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    /// Points in ascending year order. Years without a rank value have no point.
    pub points: Vec<SeriesPoint>,
}

impl LineSeries {
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.year == year)
            .map(|p| p.rank_value)
    }
}

/// Per-artist rank value lines plus their per-year average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankChart {
    pub years: Vec<i32>,
    pub artists: Vec<LineSeries>,
    /// Mean rank value per year over the artists with a point in that year.
    pub average: LineSeries,
}

impl RankChart {
    /// Smallest and largest value over every series, average included.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.artists
            .iter()
            .chain(std::iter::once(&self.average))
            .flat_map(|s| s.points.iter().map(|p| p.rank_value))
            .fold(None, |bounds, v| match bounds {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

pub const AVERAGE_SERIES_LABEL: &str = "Average";

/// Groups rows into one line per artist, in order of first appearance.
pub fn chart_series(rows: &[ScoredAggregate]) -> RankChart {
    let mut artists: Vec<LineSeries> = Vec::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    let mut per_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for row in rows {
        years.insert(row.year());
        let series = match artists.iter().position(|s| s.label == row.artist_name()) {
            Some(index) => &mut artists[index],
            None => {
                artists.push(LineSeries {
                    label: row.artist_name().to_string(),
                    points: Vec::new(),
                });
                let last = artists.len() - 1;
                &mut artists[last]
            }
        };
        let Some(rank_value) = row.rank_value else {
            continue;
        };
        series.points.push(SeriesPoint {
            year: row.year(),
            rank_value,
        });

        let entry = per_year.entry(row.year()).or_insert((0.0, 0));
        entry.0 += rank_value;
        entry.1 += 1;
    }

    for series in &mut artists {
        series.points.sort_by_key(|p| p.year);
    }

    let average = LineSeries {
        label: AVERAGE_SERIES_LABEL.to_string(),
        points: per_year
            .into_iter()
            .map(|(year, (sum, count))| SeriesPoint {
                year,
                rank_value: sum / count as f64,
            })
            .collect(),
    };

    RankChart {
        years: years.into_iter().collect(),
        artists,
        average,
    }
}
