use crate::catalog::ArtistYearAggregate;
use serde::{Deserialize, Serialize};

/// Weights of the two terms of the rank value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub count: f64,
    pub popularity: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            count: 1.0,
            popularity: 1.0,
        }
    }
}

impl RankWeights {
    pub fn new(count: f64, popularity: f64) -> Self {
        Self { count, popularity }
    }

    /// `count * song_count + popularity * avg_popularity`, or `None` for a
    /// group without any measured popularity.
    pub fn rank_value(&self, aggregate: &ArtistYearAggregate) -> Option<f64> {
        aggregate
            .avg_popularity
            .map(|avg| self.count * aggregate.song_count as f64 + self.popularity * avg)
    }
}

/// An artist/year aggregate annotated with its rank value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAggregate {
    #[serde(flatten)]
    pub aggregate: ArtistYearAggregate,
    /// Unmeasured rows carry no rank value and are left out of every mean.
    pub rank_value: Option<f64>,
}

impl ScoredAggregate {
    pub fn artist_name(&self) -> &str {
        &self.aggregate.artist_name
    }

    pub fn year(&self) -> i32 {
        self.aggregate.year
    }
}

/// Annotates every row with a rank value computed from the same weights.
///
/// Any weights are accepted, negative or zero included.
pub fn score(rows: Vec<ArtistYearAggregate>, weights: RankWeights) -> Vec<ScoredAggregate> {
    rows.into_iter()
        .map(|aggregate| ScoredAggregate {
            rank_value: weights.rank_value(&aggregate),
            aggregate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(artist: &str, year: i32, song_count: u32, avg_popularity: f64) -> ArtistYearAggregate {
        ArtistYearAggregate {
            artist_name: artist.to_string(),
            year,
            song_count,
            avg_popularity: Some(avg_popularity),
        }
    }

    fn sample_rows() -> Vec<ArtistYearAggregate> {
        vec![
            aggregate("A", 1999, 3, 50.0),
            aggregate("A", 2000, 5, 70.0),
            aggregate("B", 1999, 1, 90.0),
        ]
    }

    #[test]
    fn test_default_weights() {
        let scored = score(sample_rows(), RankWeights::default());
        let values: Vec<f64> = scored.iter().filter_map(|r| r.rank_value).collect();
        assert_eq!(values, vec![53.0, 75.0, 91.0]);
    }

    #[test]
    fn test_count_only_weights() {
        for row in score(sample_rows(), RankWeights::new(1.0, 0.0)) {
            assert_eq!(row.rank_value, Some(row.aggregate.song_count as f64));
        }
    }

    #[test]
    fn test_popularity_only_weights() {
        for row in score(sample_rows(), RankWeights::new(0.0, 1.0)) {
            assert_eq!(row.rank_value, row.aggregate.avg_popularity);
        }
    }

    #[test]
    fn test_unmeasured_popularity_has_no_rank_value() {
        let mut unrated = aggregate("A", 2001, 4, 0.0);
        unrated.avg_popularity = None;

        // Even a count-only weighting does not score it
        let scored = score(vec![unrated], RankWeights::new(1.0, 0.0));
        assert_eq!(scored[0].rank_value, None);
        assert_eq!(scored[0].aggregate.song_count, 4);
    }

    #[test]
    fn test_negative_weights_accepted() {
        let scored = score(sample_rows(), RankWeights::new(-2.0, 0.5));
        assert!((scored[0].rank_value.unwrap() - (-6.0 + 25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rows_are_preserved() {
        let rows = sample_rows();
        let scored = score(rows.clone(), RankWeights::default());
        let back: Vec<ArtistYearAggregate> = scored.into_iter().map(|r| r.aggregate).collect();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_empty_input() {
        assert!(score(Vec::new(), RankWeights::default()).is_empty());
    }
}
