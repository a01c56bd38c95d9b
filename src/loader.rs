use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::{Bar, Error, Price, Result, Timestamp};

/// Top-level host document: `{ "ohlcv_data": [ ... ] }`.
#[derive(Deserialize)]
struct Document {
    ohlcv_data: Vec<RawBar>,
}

#[derive(Deserialize)]
struct RawBar {
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
    #[serde(default)]
    timestamp: Option<RawTimestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl RawBar {
    fn into_bar(self) -> Result<Bar> {
        let timestamp = self.timestamp.map(parse_timestamp).transpose()?;

        Ok(Bar {
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            timestamp,
        })
    }
}

fn parse_timestamp(raw: RawTimestamp) -> Result<Timestamp> {
    match raw {
        RawTimestamp::Millis(ms) => Ok(ms),
        #[allow(clippy::cast_possible_truncation)]
        RawTimestamp::Fractional(ms) => Ok(ms.trunc() as Timestamp),
        RawTimestamp::Text(text) => parse_timestamp_str(&text),
    }
}

/// Parses a textual bar time into epoch milliseconds.
///
/// Accepts RFC 3339, naive date-times with a space or `T` separator, bare
/// dates and integer strings (already milliseconds). Naive forms are UTC.
fn parse_timestamp_str(text: &str) -> Result<Timestamp> {
    let text = text.trim();

    if let Ok(ms) = text.parse::<i64>() {
        return Ok(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp_millis());
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| Error::InvalidTimestamp(text.to_owned()))
}

/// Loads bars from a host JSON document.
///
/// The document must carry an `ohlcv_data` array whose records have `open`,
/// `high`, `low` and `close`, and optionally `Volume` (or `volume`) and
/// `timestamp`. Timestamps may be epoch milliseconds or date strings and are
/// normalised to milliseconds.
///
/// Strings without a zone offset (`2024-01-02 03:04:05`, `2024-01-02`) are
/// read as UTC, not as the local time of the machine running the loader, so
/// the same document always yields the same timestamps. Hosts that mean
/// local time must send an RFC 3339 string with its offset.
///
/// # Errors
///
/// [`Error::Json`] if the document is malformed or lacks `ohlcv_data`,
/// [`Error::InvalidTimestamp`] if a timestamp string cannot be parsed.
///
/// # Example
///
/// ```
/// let json = r#"{ "ohlcv_data": [
///     { "open": 1, "high": 2, "low": 0.5, "close": 1.5,
///       "Volume": 10, "timestamp": "2024-01-02" }
/// ] }"#;
///
/// let bars = candle_bands::load_bars_from_str(json).unwrap();
/// assert_eq!(bars[0].timestamp, Some(1_704_153_600_000));
/// ```
pub fn load_bars(reader: impl Read) -> Result<Vec<Bar>> {
    let document: Document = serde_json::from_reader(reader)?;
    into_bars(document)
}

/// Loads bars from an in-memory JSON document. See [`load_bars`].
///
/// # Errors
///
/// Same as [`load_bars`].
pub fn load_bars_from_str(json: &str) -> Result<Vec<Bar>> {
    let document: Document = serde_json::from_str(json)?;
    into_bars(document)
}

fn into_bars(document: Document) -> Result<Vec<Bar>> {
    let bars = document
        .ohlcv_data
        .into_iter()
        .map(RawBar::into_bar)
        .collect::<Result<Vec<_>>>()?;

    debug!(bars = bars.len(), "loaded ohlcv data");

    Ok(bars)
}
