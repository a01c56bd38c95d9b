use crate::{Error, Ohlcv, Price};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt::Display, str::FromStr};

/// Price field extracted from an [`Ohlcv`] bar before windowing.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
}

impl PriceSource {
    /// Parses a host source name, falling back to [`PriceSource::Close`] for
    /// anything unrecognised.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// ```
    /// use candle_bands::PriceSource;
    ///
    /// assert_eq!(PriceSource::parse_lenient("High"), PriceSource::High);
    /// assert_eq!(PriceSource::parse_lenient("hlc3"), PriceSource::Close);
    /// ```
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Low => ohlcv.low(),
            Self::Close => ohlcv.close(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parsing. Use [`PriceSource::parse_lenient`] for the close fallback.
impl FromStr for PriceSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            _ => Err(Error::UnknownSource(s.to_owned())),
        }
    }
}

/// Deserializes leniently: unknown names, `null` and non-string values all
/// become [`PriceSource::Close`].
impl<'de> Deserialize<'de> for PriceSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .map_or(Self::Close, Self::parse_lenient))
    }
}
