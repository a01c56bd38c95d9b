use thiserror::Error;

/// Errors raised while building a configuration or loading host data.
///
/// Band computation itself never fails: unknown price sources fall back to
/// close and results shifted out of range by the offset are dropped.
#[derive(Debug, Error)]
pub enum Error {
    /// Window length below one.
    #[error("invalid length {length}: length must be at least 1")]
    InvalidLength {
        /// The rejected length.
        length: i64,
    },

    /// Standard deviation multiplier that is negative or NaN.
    #[error("invalid std_dev multiplier {value}: must be a non-negative number")]
    InvalidMultiplier {
        /// The rejected multiplier.
        value: f64,
    },

    /// Price source name that does not match any field (strict parsing only).
    #[error("unknown price source {0:?}")]
    UnknownSource(String),

    /// Color that is not a `#RRGGBB` hex string.
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// Bar timestamp string in an unrecognised format.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// Malformed JSON document.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
