use std::num::NonZero;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{BbConfig, Error, PriceSource, Result, StdDev};

/// Bollinger Bands parameters as the host's settings panel sends them.
///
/// ```json
/// { "length": 20, "source": "close", "stdDev": 2, "offset": 0 }
/// ```
///
/// Every field is optional and defaults to the standard BB(20, close, 2, 0).
/// Unknown or non-string sources fall back to close. `length` and `offset`
/// also accept integral floats such as `20.0`, as JavaScript hosts send them. Convert with [`BbConfig::try_from`],
/// which rejects lengths below one and negative multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BbParams {
    #[serde(deserialize_with = "integral")]
    pub length: i64,
    pub source: PriceSource,
    #[serde(alias = "std_dev", alias = "multiplier")]
    pub std_dev: f64,
    #[serde(deserialize_with = "integral")]
    pub offset: i64,
}

/// Reads an integer, or a float with no fractional part.
fn integral<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        Number::Float(f) if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) => Ok(f as i64),
        Number::Float(f) => Err(D::Error::custom(format!("expected an integer, got {f}"))),
    }
}

impl Default for BbParams {
    fn default() -> Self {
        Self {
            length: 20,
            source: PriceSource::Close,
            std_dev: 2.0,
            offset: 0,
        }
    }
}

impl TryFrom<BbParams> for BbConfig {
    type Error = Error;

    fn try_from(params: BbParams) -> Result<Self> {
        let length = usize::try_from(params.length)
            .ok()
            .and_then(NonZero::new)
            .ok_or(Error::InvalidLength {
                length: params.length,
            })?;

        // Offsets beyond isize drop every result either way.
        let offset = isize::try_from(params.offset).unwrap_or(if params.offset < 0 {
            isize::MIN
        } else {
            isize::MAX
        });

        Ok(Self::builder()
            .length(length)
            .source(params.source)
            .std_dev(StdDev::try_new(params.std_dev)?)
            .offset(offset)
            .build())
    }
}

impl From<BbConfig> for BbParams {
    fn from(config: BbConfig) -> Self {
        Self {
            length: i64::try_from(config.length()).unwrap_or(i64::MAX),
            source: config.source(),
            std_dev: config.std_dev().value(),
            offset: i64::try_from(config.offset()).unwrap_or(i64::MAX),
        }
    }
}

impl BbConfig {
    /// Parses and validates a [`BbParams`] JSON record.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] for malformed JSON, [`Error::InvalidLength`] or
    /// [`Error::InvalidMultiplier`] for out-of-range values.
    ///
    /// # Example
    ///
    /// ```
    /// use candle_bands::{BbConfig, PriceSource};
    ///
    /// let config = BbConfig::from_json(r#"{ "length": 10, "source": "high", "offset": -2 }"#)
    ///     .unwrap();
    ///
    /// assert_eq!(config.length(), 10);
    /// assert_eq!(config.source(), PriceSource::High);
    /// assert_eq!(config.std_dev().value(), 2.0);
    /// assert_eq!(config.offset(), -2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<BbParams>(json)?.try_into()
    }
}
