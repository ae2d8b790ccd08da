use serde::Serialize;
use std::fmt;

/// First year covered by the dataset.
pub const MIN_YEAR: i32 = 1998;
/// Last year covered by the dataset.
pub const MAX_YEAR: i32 = 2020;

/// Whether `[start_year, end_year]` is a usable query window.
///
/// True iff `MIN_YEAR <= start_year <= end_year <= MAX_YEAR`. A false result
/// means the window must not be queried.
pub fn validate(start_year: i32, end_year: i32) -> bool {
    start_year >= MIN_YEAR && end_year <= MAX_YEAR && start_year <= end_year
}

/// An inclusive year window that already passed [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start_year: i32, end_year: i32) -> Option<Self> {
        if validate(start_year, end_year) {
            Some(YearRange {
                start: start_year,
                end: end_year,
            })
        } else {
            None
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
