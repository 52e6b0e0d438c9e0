//! Time values as written in the sheet.
//!
//! A colon-free value is kept as the author wrote it (`"5"`, `"60.50"`) and
//! rendered verbatim. Only `min:sec` values are converted to seconds.

use std::fmt;

/// A point in playback time.
#[derive(Debug, Clone, PartialEq)]
pub enum Moment {
    /// Colon-free value, kept verbatim.
    Text(String),
    /// Seconds computed from a `min:sec` value.
    Seconds(f64),
}

impl Moment {
    /// The moment used when a row never opened one explicitly.
    pub fn zero() -> Self {
        Self::Text("0".to_string())
    }

    /// Numeric value in seconds, if the text parses.
    pub fn as_secs(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.parse().ok(),
            Self::Seconds(secs) => Some(*secs),
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            // Debug keeps the fractional part: 90.0, not 90.
            Self::Seconds(secs) => write!(f, "{secs:?}"),
        }
    }
}

/// Normalize a textual time value.
///
/// `"1:32.2"` → `Seconds(92.2)`; anything without a colon is returned
/// unchanged as `Text`. Values that are not a single well-formed `min:sec`
/// pair are also kept verbatim, so the directive grammar rejects them
/// instead of this function.
pub fn normalize(value: &str) -> Moment {
    let Some((minutes, seconds)) = value.split_once(':') else {
        return Moment::Text(value.to_string());
    };

    match (minutes.parse::<f64>(), seconds.parse::<f64>()) {
        // A second colon stays in `seconds` and fails the parse.
        (Ok(minutes), Ok(seconds)) => Moment::Seconds(minutes * 60.0 + seconds),
        _ => Moment::Text(value.to_string()),
    }
}
