use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open time in milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// OHLCV bar data used as input to band computation.
///
/// Implement this on your own kline/candle type to avoid conversion. The
/// calculator accepts `&[impl Ohlcv]` and extracts the configured
/// [`PriceSource`](crate::PriceSource) internally.
///
/// Only the four price fields are read. [`volume`](Ohlcv::volume) and
/// [`timestamp`](Ohlcv::timestamp) are carried for the host's benefit.
///
/// # Example
///
/// ```
/// use candle_bands::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar, if known.
    fn volume(&self) -> Option<f64> {
        None
    }

    /// Bar open time, if known. Non-decreasing across a sequence.
    fn timestamp(&self) -> Option<Timestamp> {
        None
    }
}

/// A single OHLCV sample.
///
/// The crate's own [`Ohlcv`] implementation, produced by
/// [`load_bars`](crate::load_bars) from the host's JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    #[serde(default, alias = "Volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl Bar {
    /// Bar with prices only, no volume or timestamp.
    #[must_use]
    pub fn new(open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: None,
            timestamp: None,
        }
    }

    /// Sets the bar open time.
    #[must_use]
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> Option<f64> {
        self.volume
    }

    fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }
}
