#![allow(dead_code)]

use candle_bands::{Bar, BbValue, load_bars};
use serde::{Deserialize, de::DeserializeOwned};
use std::fs::File;

/// Reference BB value at a bar index.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub index: usize,
    pub basis: f64,
    pub upper: f64,
    pub lower: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv.json";

/// Load the fixture bars through the public JSON loader.
pub fn load_reference_bars() -> Vec<Bar> {
    let file = File::open(OHLCV_PATH).unwrap_or_else(|e| panic!("failed to open {OHLCV_PATH}: {e}"));
    load_bars(file).unwrap_or_else(|e| panic!("failed to load {OHLCV_PATH}: {e}"))
}

/// Load BB reference data (index, basis, upper, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Installs a test-writer subscriber honouring `RUST_LOG`. Safe to call
/// from several tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert every band of `value` matches `reference`.
pub fn assert_bb_near(value: &BbValue, reference: &RefBbValue, tolerance: f64, context: &str) {
    for (band, actual, expected) in [
        ("upper", value.upper(), reference.upper),
        ("basis", value.basis(), reference.basis),
        ("lower", value.lower(), reference.lower),
    ] {
        assert_near(actual, expected, tolerance, &format!("{context} {band}"));
    }
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
