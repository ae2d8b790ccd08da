//! End-to-end tests for the top artists ranking against a SQLite catalog.

mod common;

use common::*;
use std::io::Write;
use top_artists::ranking::Cell;
use top_artists::{
    presenter, top_artists, AppConfig, CliConfig, FileConfig, RankWeights, RankingConfig,
    RankingError, RankingOutcome, TopArtistsReport, YearColumns, YearRange,
};

fn ranked(outcome: RankingOutcome) -> TopArtistsReport {
    match outcome {
        RankingOutcome::Ranked(report) => report,
        RankingOutcome::NoData { range } => panic!("Expected a ranking, got no data for {}", range),
    }
}

fn artist_names(report: &TopArtistsReport) -> Vec<&str> {
    report
        .artists
        .iter()
        .map(|a| a.artist_name.as_str())
        .collect()
}

#[test]
fn test_higher_mean_beats_more_songs() {
    let test = TestCatalog::spawn();
    let config = RankingConfig {
        top_n: 1,
        ..Default::default()
    };

    let report = ranked(top_artists(&test.catalog, 1998, 2020, &config).unwrap());

    // Alpha means (3+50, 5+70) = 64, Beta means 1+90 = 91
    assert_eq!(artist_names(&report), vec![ARTIST_BETA]);
    assert_close(report.artists[0].avg_rank_value, 91.0);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.table.years, vec![1999]);
    assert_eq!(report.table.get(ARTIST_BETA, 1999), Some(Cell::Value(90.0)));
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_default_ranking_over_full_window() {
    let test = TestCatalog::spawn();
    let report = ranked(top_artists(&test.catalog, 1998, 2020, &RankingConfig::default()).unwrap());

    assert_eq!(
        artist_names(&report),
        vec![ARTIST_BETA, ARTIST_ALPHA, ARTIST_GAMMA]
    );
    assert_close(report.artists[1].avg_rank_value, 64.0);
    assert_close(report.artists[2].avg_rank_value, 17.0);

    let table = &report.table;
    assert_eq!(table.artists, vec![ARTIST_BETA, ARTIST_ALPHA, ARTIST_GAMMA]);
    assert_eq!(table.years, vec![1999, 2000, 2015]);
    assert_eq!(table.get(ARTIST_ALPHA, 1999), Some(Cell::Value(50.0)));
    assert_eq!(table.get(ARTIST_ALPHA, 2000), Some(Cell::Value(70.0)));
    assert_eq!(table.get(ARTIST_BETA, 2000), Some(Cell::NoData));
    assert_eq!(table.get(ARTIST_GAMMA, 2015), Some(Cell::Value(15.0)));
    assert_eq!(table.row_average(ARTIST_ALPHA), Some(60.0));

    // Per-year chart average over artists with data that year
    assert_close(report.chart.average.value_at(1999).unwrap(), (91.0 + 53.0) / 2.0);
    assert_close(report.chart.average.value_at(2015).unwrap(), 17.0);
}

#[test]
fn test_song_without_popularity_is_no_data_not_zero() {
    let test = TestCatalog::spawn();
    test.execute(
        "INSERT INTO Song (ArtistID, GenreID, Year, Popularity, Danceability, Duration)
         VALUES (2, 1, 2001, NULL, 0.5, 200000);",
    )
    .unwrap();

    let report = ranked(top_artists(&test.catalog, 1998, 2020, &RankingConfig::default()).unwrap());

    // Beta's unrated 2001 neither scores 1 + 0 nor lowers the 91 mean
    assert_eq!(report.artists[0].artist_name, ARTIST_BETA);
    assert_close(report.artists[0].avg_rank_value, 91.0);
    assert_eq!(report.artists[0].years_with_songs, 1);

    let table = &report.table;
    assert_eq!(table.years, vec![1999, 2000, 2001, 2015]);
    assert_eq!(table.get(ARTIST_BETA, 2001), Some(Cell::NoData));
    assert_eq!(table.get(ARTIST_BETA, 1999), Some(Cell::Value(90.0)));
    assert_eq!(table.row_average(ARTIST_BETA), Some(90.0));
    assert!(report.chart.average.value_at(2001).is_none());
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_window_of_unrated_songs_reports_no_data() {
    let test = TestCatalog::spawn();
    test.execute(
        "INSERT INTO Song (ArtistID, GenreID, Year, Popularity, Danceability, Duration)
         VALUES (3, 2, 2007, NULL, 0.4, 230000);",
    )
    .unwrap();

    let outcome = top_artists(
        &test.catalog,
        EMPTY_START_YEAR,
        EMPTY_END_YEAR,
        &RankingConfig::default(),
    )
    .unwrap();

    assert!(matches!(outcome, RankingOutcome::NoData { .. }));
}

#[test]
fn test_invalid_ranges_are_rejected() {
    let test = TestCatalog::spawn();

    for (start, end) in [(2021, 2021), (1997, 2000), (2010, 2005), (1998, 2021)] {
        let result = top_artists(&test.catalog, start, end, &RankingConfig::default());
        assert!(
            matches!(result, Err(RankingError::InvalidRange { .. })),
            "{}-{} should be rejected",
            start,
            end
        );
    }
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_single_year_bounds_are_valid() {
    let test = TestCatalog::spawn();

    let first = top_artists(&test.catalog, 1998, 1998, &RankingConfig::default()).unwrap();
    assert_eq!(
        first,
        RankingOutcome::NoData {
            range: YearRange::new(1998, 1998).unwrap()
        }
    );

    let last = top_artists(&test.catalog, 2020, 2020, &RankingConfig::default()).unwrap();
    assert!(matches!(last, RankingOutcome::NoData { .. }));
}

#[test]
fn test_empty_window_reports_no_data() {
    let test = TestCatalog::spawn();
    let outcome = top_artists(
        &test.catalog,
        EMPTY_START_YEAR,
        EMPTY_END_YEAR,
        &RankingConfig::default(),
    )
    .unwrap();

    let range = match outcome {
        RankingOutcome::NoData { range } => range,
        other => panic!("Expected no data, got {:?}", other),
    };
    assert_eq!(
        presenter::no_data_message(range),
        "No data found for the years 2005-2010."
    );
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_catalog_without_songs_reports_no_data() {
    let test = TestCatalog::empty();
    let outcome = top_artists(&test.catalog, 1998, 2020, &RankingConfig::default()).unwrap();
    assert!(matches!(outcome, RankingOutcome::NoData { .. }));
}

#[test]
fn test_window_excludes_outside_years() {
    let test = TestCatalog::spawn();
    let report = ranked(top_artists(&test.catalog, 2000, 2015, &RankingConfig::default()).unwrap());

    // Beta only has songs in 1999
    assert_eq!(artist_names(&report), vec![ARTIST_ALPHA, ARTIST_GAMMA]);
    assert_close(report.artists[0].avg_rank_value, 75.0);
    assert_eq!(report.table.years, vec![2000, 2015]);
}

#[test]
fn test_requested_year_columns_span_the_window() {
    let test = TestCatalog::spawn();
    let config = RankingConfig {
        year_columns: YearColumns::Requested,
        ..Default::default()
    };
    let report = ranked(top_artists(&test.catalog, 1998, 2001, &config).unwrap());

    assert_eq!(report.table.years, vec![1998, 1999, 2000, 2001]);
    assert_eq!(report.table.get(ARTIST_ALPHA, 1998), Some(Cell::NoData));
    assert_eq!(report.table.get(ARTIST_ALPHA, 2000), Some(Cell::Value(70.0)));
}

#[test]
fn test_count_weight_changes_the_winner() {
    let test = TestCatalog::spawn();
    let config = RankingConfig {
        weights: RankWeights::new(1.0, 0.0),
        ..Default::default()
    };
    let report = ranked(top_artists(&test.catalog, 1998, 2020, &config).unwrap());

    // Mean songs per year: Alpha 4, Gamma Ray 2, Beta 1
    assert_eq!(
        artist_names(&report),
        vec![ARTIST_ALPHA, ARTIST_GAMMA, ARTIST_BETA]
    );
    // The table still shows popularity, not the rank value
    assert_eq!(report.table.get(ARTIST_BETA, 1999), Some(Cell::Value(90.0)));
}

#[test]
fn test_repeated_requests_give_identical_reports() {
    let test = TestCatalog::spawn();
    let config = RankingConfig::default();

    let first = top_artists(&test.catalog, 1998, 2020, &config).unwrap();
    let second = top_artists(&test.catalog, 1998, 2020, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_catalog_failure_releases_connection() {
    let test = TestCatalog::spawn();
    test.execute("DROP TABLE Song;").unwrap();

    let result = top_artists(&test.catalog, 1998, 2020, &RankingConfig::default());

    assert!(matches!(result, Err(RankingError::DataSource(_))));
    assert_eq!(test.catalog.open_connections(), 0);
}

#[test]
fn test_json_report() {
    let test = TestCatalog::spawn();
    let report = ranked(top_artists(&test.catalog, 1998, 2020, &RankingConfig::default()).unwrap());

    let json: serde_json::Value =
        serde_json::from_str(&presenter::render_json(&report).unwrap()).unwrap();

    assert_eq!(json["range"]["start"], 1998);
    assert_eq!(json["artists"][0]["artist_name"], ARTIST_BETA);
    // Beta has no songs in 2000
    assert_eq!(json["table"]["cells"][0][1], serde_json::Value::Null);
    assert_eq!(json["chart"]["average"]["label"], "Average");
}

#[test]
fn test_config_file_drives_the_ranking() {
    let test = TestCatalog::spawn();
    let config_path = test.temp_dir.path().join("top-artists.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        "catalog_db = {:?}\n\n[ranking]\ntop_n = 2\nyear_columns = \"observed\"",
        test.db_path.display().to_string()
    )
    .unwrap();

    let file_config = FileConfig::load(&config_path).unwrap();
    let app_config = AppConfig::resolve(&CliConfig::default(), Some(file_config)).unwrap();
    assert_eq!(app_config.catalog_db, test.db_path);

    let catalog = top_artists::SqliteSongCatalog::open(&app_config.catalog_db).unwrap();
    let report = ranked(top_artists(&catalog, 1998, 2020, &app_config.ranking).unwrap());
    assert_eq!(artist_names(&report), vec![ARTIST_BETA, ARTIST_ALPHA]);
}
