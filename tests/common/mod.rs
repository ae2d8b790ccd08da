//! Common test infrastructure
//!
//! Tests build a temporary catalog through [`TestCatalog::spawn`] and only
//! import from this module.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestCatalog;

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
