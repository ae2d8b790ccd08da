//! Terminal and JSON rendering of ranking and genre results.
//!
//! Builders return plain strings or [`TableBuilder`]s so they can be checked
//! without a terminal; the `print_*` functions add color and write to stdout.

use crate::cli_style::{self, colors, TableBuilder};
use crate::genre_stats::{GenreComparison, GenreYearSummary};
use crate::ranking::{LineSeries, RankChart, TopArtistsReport, YearRange, NO_DATA_MARKER};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

pub const INVALID_RANGE_MESSAGE: &str = "Invalid input. Please enter years between 1998 and 2020, with the start year being less than or equal to the end year.";

pub fn no_data_message(range: YearRange) -> String {
    format!("No data found for the years {}.", range)
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_GAP: char = ' ';

/// Artist by year table of average popularity with a trailing `Average` column.
pub fn report_table(report: &TopArtistsReport) -> TableBuilder {
    let table = &report.table;
    let mut headers = vec!["Artist".to_string()];
    headers.extend(table.years.iter().map(|y| y.to_string()));
    headers.push("Average".to_string());

    let mut builder = TableBuilder::new(headers);
    for column in 1..=table.years.len() + 1 {
        builder = builder.align_right(column);
    }

    for (artist, cells) in table.artists.iter().zip(&table.cells) {
        let mut row = vec![artist.clone()];
        row.extend(cells.iter().map(|c| c.to_string()));
        row.push(match table.row_average(artist) {
            Some(avg) => format!("{:.2}", avg),
            None => NO_DATA_MARKER.to_string(),
        });
        builder.add_row(row);
    }
    builder
}

/// One character per year of `years`; years without a point are a gap.
pub fn sparkline(series: &LineSeries, years: &[i32], bounds: (f64, f64)) -> String {
    let (lo, hi) = bounds;
    let span = hi - lo;
    years
        .iter()
        .map(|year| match series.value_at(*year) {
            None => SPARK_GAP,
            Some(_) if span.abs() < f64::EPSILON => SPARK_LEVELS[SPARK_LEVELS.len() / 2],
            Some(value) => {
                let scaled = ((value - lo) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[(scaled.max(0.0) as usize).min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// `(label, sparkline)` pairs for every artist line followed by the average line.
pub fn chart_lines(chart: &RankChart) -> Vec<(String, String)> {
    let Some(bounds) = chart.value_bounds() else {
        return Vec::new();
    };
    chart
        .artists
        .iter()
        .chain(std::iter::once(&chart.average))
        .map(|series| (series.label.clone(), sparkline(series, &chart.years, bounds)))
        .collect()
}

/// Plain-text chart: one labelled sparkline per series, then a year axis.
pub fn render_chart(chart: &RankChart) -> String {
    let lines = chart_lines(chart);
    if lines.is_empty() {
        return String::new();
    }
    let label_width = lines.iter().map(|(l, _)| l.width()).max().unwrap_or(0);

    let mut out: Vec<String> = lines
        .iter()
        .map(|(label, spark)| {
            let padding = " ".repeat(label_width - label.width());
            format!("{}{} │{}│", label, padding, spark)
        })
        .collect();

    if let (Some(first), Some(last)) = (chart.years.first(), chart.years.last()) {
        out.push(format!(
            "{} {} .. {} ({} years)",
            " ".repeat(label_width),
            first,
            last,
            chart.years.len()
        ));
    }
    out.join("\n")
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")
}

pub fn print_report(report: &TopArtistsReport) {
    cli_style::print_section_header(&format!(
        "Top {} artists {}",
        report.artists.len(),
        report.range
    ));
    println!();
    report_table(report).print();
    println!();

    let Some(bounds) = report.chart.value_bounds() else {
        cli_style::print_section_footer();
        return;
    };
    println!(
        "  {}",
        format!("Rank value by year ({:.2} .. {:.2})", bounds.0, bounds.1).with(colors::DIM)
    );
    let label_width = chart_lines(&report.chart)
        .iter()
        .map(|(l, _)| l.width())
        .max()
        .unwrap_or(0);
    for (i, (label, spark)) in chart_lines(&report.chart).into_iter().enumerate() {
        let color = if i < report.chart.artists.len() {
            colors::SERIES[i % colors::SERIES.len()]
        } else {
            colors::WHITE
        };
        let padding = " ".repeat(label_width - label.width());
        println!("  {}{} {}", label.with(color).bold(), padding, spark.with(color));
    }
    if let (Some(first), Some(last)) = (report.chart.years.first(), report.chart.years.last()) {
        println!(
            "  {} {}",
            " ".repeat(label_width),
            format!("{} .. {}", first, last).with(colors::DIM)
        );
    }
    cli_style::print_section_footer();
}

pub fn genre_profile_table(profile: &[GenreComparison]) -> TableBuilder {
    let mut builder = TableBuilder::new(vec!["Genre", "Artist", "Overall", ""])
        .align_right(1)
        .align_right(2);
    for row in profile {
        builder.add_row(vec![
            row.genre.clone(),
            format!("{:.2}", row.artist_avg_popularity),
            format!("{:.2}", row.overall_avg_popularity),
            if row.above_overall { "▲" } else { "▼" }.to_string(),
        ]);
    }
    builder
}

pub fn print_genre_profile(artist_name: &str, profile: &[GenreComparison]) {
    cli_style::print_section_header(&format!("Genre popularity of {}", artist_name));
    if profile.is_empty() {
        cli_style::print_empty_list("No rated songs for this artist");
    } else {
        genre_profile_table(profile).print();
    }
    cli_style::print_section_footer();
}

pub fn year_summary_table(summary: &[GenreYearSummary]) -> TableBuilder {
    let mut builder = TableBuilder::new(vec![
        "Genre",
        "Danceability",
        "Duration",
        "Popularity",
        "Songs",
    ]);
    for column in 1..=4 {
        builder = builder.align_right(column);
    }
    for row in summary {
        builder.add_row(vec![
            row.genre.clone(),
            measured(row.avg_danceability, 3),
            measured(row.avg_duration, 0),
            measured(row.avg_popularity, 2),
            row.total_songs.to_string(),
        ]);
    }
    builder
}

fn measured(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => NO_DATA_MARKER.to_string(),
    }
}

pub fn print_year_summary(year: i32, summary: &[GenreYearSummary]) {
    cli_style::print_section_header(&format!("Genres of {}", year));
    year_summary_table(summary).print();
    cli_style::print_section_footer();
}
