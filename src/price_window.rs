use crate::{Ohlcv, Price, PriceSource};

/// Mean and population standard deviation of one complete window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WindowStats {
    pub mean: Price,
    pub std_dev: f64,
}

/// Extracts the configured price from every bar, index-aligned with `bars`.
pub(crate) fn source_values(bars: &[impl Ohlcv], source: PriceSource) -> Vec<Price> {
    bars.iter().map(|bar| source.extract(bar)).collect()
}

/// Population statistics of a non-empty window.
///
/// Two passes: the mean first, then the mean of squared deviations from it
/// (divisor is the window size, not size - 1). Each window is recomputed
/// from its values; there are no running sums to drift.
#[inline]
pub(crate) fn population_stats(window: &[Price]) -> WindowStats {
    debug_assert!(!window.is_empty(), "window must not be empty");

    #[allow(clippy::cast_precision_loss)]
    let n = window.len() as f64;

    let mean = window.iter().sum::<Price>() / n;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    WindowStats {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Statistics for every complete window of `length` values, in order.
///
/// Yields `(end_index, stats)` where `end_index` is the index of the last
/// value in the window. Yields nothing if `values` is shorter than `length`.
pub(crate) fn rolling_stats(
    values: &[Price],
    length: usize,
) -> impl Iterator<Item = (usize, WindowStats)> + '_ {
    values
        .windows(length)
        .enumerate()
        .map(move |(start, window)| (start + length - 1, population_stats(window)))
}
