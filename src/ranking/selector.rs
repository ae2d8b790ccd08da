use super::scorer::ScoredAggregate;
use serde::Serialize;
use std::collections::HashMap;

/// An artist with the mean rank value of its rows in one result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRankSummary {
    pub artist_name: String,
    pub avg_rank_value: f64,
    /// Number of measured (artist, year) rows the mean was taken over.
    pub years_with_songs: usize,
}

/// The artists kept by [`select_top`] and all of their rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSelection {
    /// Selected artists, best first.
    pub artists: Vec<ArtistRankSummary>,
    /// Every row of the selected artists, grouped by artist in `artists`
    /// order; within an artist the input order is kept.
    pub rows: Vec<ScoredAggregate>,
}

impl TopSelection {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    pub fn artist_names(&self) -> impl Iterator<Item = &str> {
        self.artists.iter().map(|a| a.artist_name.as_str())
    }
}

/// Mean rank value of every artist in `rows`, best first.
///
/// Rows without a rank value are skipped; an artist with no measured row
/// has no mean and is not ranked. Exact ties keep the order in which the
/// artists first appear in `rows`.
pub fn rank_artists(rows: &[ScoredAggregate]) -> Vec<ArtistRankSummary> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64, usize)> = Vec::new();

    for row in rows {
        let Some(rank_value) = row.rank_value else {
            continue;
        };
        let index = *first_seen.entry(row.artist_name()).or_insert_with(|| {
            totals.push((row.artist_name(), 0.0, 0));
            totals.len() - 1
        });
        let entry = &mut totals[index];
        entry.1 += rank_value;
        entry.2 += 1;
    }

    let mut summaries: Vec<ArtistRankSummary> = totals
        .into_iter()
        .map(|(name, sum, count)| ArtistRankSummary {
            artist_name: name.to_string(),
            avg_rank_value: sum / count as f64,
            years_with_songs: count,
        })
        .collect();

    // sort_by is stable, which gives the first-seen tie-break
    summaries.sort_by(|a, b| b.avg_rank_value.total_cmp(&a.avg_rank_value));
    summaries
}

/// Keeps the `top_n` artists with the highest mean rank value.
///
/// Selection is per artist, but all rows of each selected artist are returned,
/// unmeasured ones included.
/// Fewer than `top_n` distinct artists in the input means all of them are kept.
pub fn select_top(rows: Vec<ScoredAggregate>, top_n: usize) -> TopSelection {
    let mut artists = rank_artists(&rows);
    artists.truncate(top_n);

    let rank_of: HashMap<String, usize> = artists
        .iter()
        .enumerate()
        .map(|(rank, a)| (a.artist_name.clone(), rank))
        .collect();

    let mut grouped: Vec<Vec<ScoredAggregate>> = vec![Vec::new(); artists.len()];
    for row in rows {
        if let Some(&rank) = rank_of.get(row.artist_name()) {
            grouped[rank].push(row);
        }
    }

    TopSelection {
        artists,
        rows: grouped.into_iter().flatten().collect(),
    }
}
