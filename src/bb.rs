use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    Error, Ohlcv, Price, PriceSource, Result,
    price_window::{rolling_stats, source_values},
};

/// Standard deviation multiplier for Bollinger Bands.
///
/// Wraps a non-negative, non-NaN `f64`. Zero is allowed and collapses the
/// bands onto the basis.
///
/// Defaults to `2.0` (the standard Bollinger Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct StdDev(f64);

impl StdDev {
    /// Creates a new standard deviation multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or NaN.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "std_dev must not be NaN");
        assert!(value >= 0.0, "std_dev must not be negative");
        Self(value)
    }

    /// Fallible counterpart of [`StdDev::new`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMultiplier`] if `value` is negative or NaN.
    pub fn try_new(value: f64) -> Result<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(Error::InvalidMultiplier { value });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Configuration for Bollinger Bands ([`Bb`]).
///
/// `offset` shifts where each result is written relative to the last bar of
/// its window: `+k` moves results `k` bars to the right, `-k` to the left.
/// Results shifted outside the series are dropped.
///
/// # Example
///
/// ```
/// use candle_bands::{BbConfig, PriceSource, StdDev};
/// use std::num::NonZero;
///
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .source(PriceSource::High)
///     .std_dev(StdDev::new(2.5))
///     .offset(-3)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.offset(), -3);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: NonZero<usize>,
    source: PriceSource,
    std_dev: StdDev,
    offset: isize,
}

impl BbConfig {
    /// Returns a new builder with default source, multiplier and offset.
    #[must_use]
    pub fn builder() -> BbConfigBuilder {
        BbConfigBuilder::new()
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Price source extracted from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// Output shift in bars.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// BB(20, close, 2σ, offset 0), the standard setting.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().length(NonZero::new(20).unwrap()).build()
    }

    /// BB with custom length, close price, 2σ, no offset.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for BbConfig {
    fn default() -> Self {
        Self::default_20()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value(),
            self.offset
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `std_dev` = `2.0`,
/// `offset` = `0`. Length must be set before calling
/// [`build`](BbConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
    std_dev: StdDev,
    offset: isize,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            std_dev: StdDev::default(),
            offset: 0,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }

    #[inline]
    #[must_use]
    pub fn offset(mut self, offset: isize) -> Self {
        self.offset = offset;
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// Panics if the length was never set.
    #[inline]
    #[must_use]
    pub fn build(self) -> BbConfig {
        BbConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            std_dev: self.std_dev,
            offset: self.offset,
        }
    }
}

/// Bollinger Bands value at one output position.
///
/// The basis is the mean of the window. Upper and lower bands sit
/// `std_dev × σ` away from it, where `σ` is the population standard
/// deviation of the window.
///
/// ```text
/// upper = basis + k × σ
/// basis = mean
/// lower = basis − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BbValue {
    basis: Price,
    upper: Price,
    lower: Price,
}

impl BbValue {
    /// Creates a band triple from precomputed values.
    #[must_use]
    pub fn new(basis: Price, upper: Price, lower: Price) -> Self {
        Self {
            basis,
            upper,
            lower,
        }
    }

    /// Middle line: mean of the window.
    #[inline]
    #[must_use]
    pub fn basis(&self) -> Price {
        self.basis
    }

    /// Upper band: `basis + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Lower band: `basis − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, b: {}, l: {})",
            self.upper, self.basis, self.lower
        )
    }
}

/// Bollinger Bands (BB) calculator.
///
/// A pure batch transform: [`compute`](Bb::compute) takes the whole bar
/// series and returns one optional [`BbValue`] per bar. Positions before the
/// first complete window, and positions no window is shifted onto, are
/// `None`. Nothing is cached between calls.
///
/// # Example
///
/// ```
/// use candle_bands::{Bar, Bb, BbConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = (1..=25)
///     .map(|c| Bar::new(c as f64, c as f64, c as f64, c as f64))
///     .collect();
///
/// let bb = Bb::new(BbConfig::close(NonZero::new(20).unwrap()));
/// let bands = bb.compute(&bars);
///
/// assert_eq!(bands.len(), 25);
/// assert!(bands[18].is_none());
/// assert_eq!(bands[19].unwrap().basis(), 10.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bb {
    config: BbConfig,
}

impl Bb {
    #[must_use]
    pub fn new(config: BbConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BbConfig {
        &self.config
    }

    /// Computes the bands for `bars`.
    ///
    /// The output has the same length as `bars`. The window ending at bar
    /// `i` is written to position `i + offset`; windows landing outside the
    /// series are computed and discarded.
    #[must_use]
    pub fn compute(&self, bars: &[impl Ohlcv]) -> Vec<Option<BbValue>> {
        let n = bars.len();
        let length = self.config.length();
        let offset = self.config.offset;
        let multiplier = self.config.std_dev.value();

        let mut bands = vec![None; n];

        if n < length {
            debug!(bars = n, config = %self.config, "not enough bars for a full window");
            return bands;
        }

        let values = source_values(bars, self.config.source);

        for (end, stats) in rolling_stats(&values, length) {
            let Some(target) = end.checked_add_signed(offset).filter(|&t| t < n) else {
                trace!(window_end = end, offset, "band shifted out of range");
                continue;
            };

            let spread = multiplier * stats.std_dev;

            bands[target] = Some(BbValue {
                basis: stats.mean,
                upper: stats.mean + spread,
                lower: stats.mean - spread,
            });
        }

        debug!(
            bars = n,
            config = %self.config,
            present = bands.iter().flatten().count(),
            "computed bollinger bands"
        );

        bands
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev.value(),
            self.config.offset,
        )
    }
}

/// Computes Bollinger Bands for `bars` under `config`.
///
/// Shorthand for `Bb::new(*config).compute(bars)`.
#[must_use]
pub fn bollinger_bands(bars: &[impl Ohlcv], config: &BbConfig) -> Vec<Option<BbValue>> {
    Bb::new(*config).compute(bars)
}
