//! Typed failures surfaced to the UI layer.

use thiserror::Error;

/// Domain failures of chart recomputation.
///
/// Every variant is immediately surfaced to the caller; there are no
/// retries. A failed recomputation never replaces the previous
/// `SeriesSet` (stale-but-valid view over a crash or wrong coloring).
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    /// More simultaneous series than the palette has colors.
    #[error("palette exhausted: {needed} series requested but only {available} colors available")]
    PaletteExhausted {
        /// Number of series the recomputation produced.
        needed: usize,
        /// Size of the fixed palette.
        available: usize,
    },

    /// Year bounds are non-numeric or start > end.
    #[error("invalid year range: {0}")]
    InvalidRange(String),

    /// The grouping key is not one of country, sex, age, none.
    #[error("unknown grouping key: {0:?}")]
    InvalidGroupKey(String),

    /// Too few distinct points to fit a trend line.
    #[error("insufficient data for regression: {0}")]
    InsufficientData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChartError::PaletteExhausted {
            needed: 25,
            available: 20,
        };
        assert!(err.to_string().contains("25"));
        assert!(err.to_string().contains("20"));

        let err = ChartError::InvalidRange("2016 > 1979".to_string());
        assert!(err.to_string().contains("invalid year range"));

        let err = ChartError::InvalidGroupKey("region".to_string());
        assert!(err.to_string().contains("region"));
    }
}
