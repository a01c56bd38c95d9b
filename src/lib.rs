//! Bollinger Bands for candlestick charts.
//!
//! The crate is split into a pure calculator and a rendering adapter:
//!
//! - [`Bb::compute`] turns a bar series into one optional [`BbValue`] per
//!   bar, given a [`BbConfig`] (length, price source, multiplier, offset).
//! - [`draw_bands`] turns those values into polylines and a fill polygon on
//!   a host [`Renderer`], styled by [`StyleSettings`].
//! - [`BandOverlay`] ties the two together and recomputes only when bars or
//!   parameters change.
//!
//! Host data comes in as JSON: [`load_bars`] reads the `ohlcv_data`
//! document, [`BbConfig::from_json`] reads the parameter record and
//! [`StyleSettings`] deserializes directly.
//!
//! The library emits [`tracing`] events and never installs a subscriber.

mod bb;
mod error;
mod loader;
mod ohlcv;
mod overlay;
mod params;
mod price_source;
mod price_window;
mod render;
mod style;

pub use crate::error::{Error, Result};
pub use crate::loader::{load_bars, load_bars_from_str};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::params::BbParams;
pub use crate::price_source::PriceSource;

pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbValue, StdDev, bollinger_bands};

pub use crate::overlay::BandOverlay;
pub use crate::render::{DrawCommand, Point, Renderer, Viewport, draw_bands};
pub use crate::style::{Band, Color, Fill, LineStyle, Stroke, StyleSettings};

#[cfg(test)]
mod test_util;
