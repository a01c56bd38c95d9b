// src/test_util.rs

pub use crate::Bar;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Convenience: bar with just a close price (OHLC all equal to close).
pub fn bar(close: f64) -> Bar {
    Bar::new(close, close, close, close)
}

/// Bars whose prices all equal the given closes, in order.
pub fn closes(values: &[f64]) -> Vec<Bar> {
    values.iter().copied().map(bar).collect()
}

/// Bars with closes `1.0..=n`.
pub fn ramp(n: usize) -> Vec<Bar> {
    #[allow(clippy::cast_precision_loss)]
    (1..=n).map(|i| bar(i as f64)).collect()
}
