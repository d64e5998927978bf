use rust_decimal::Decimal;

use crate::Timestamp;

/// Errors raised by indicator construction and computation.
///
/// Too little input is *not* an error: indicators report undefined
/// positions instead. Errors are reserved for caller contract violations
/// (non-positive periods or multipliers, unordered input).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("{indicator} period must be a positive integer, got {period}")]
    InvalidPeriod {
        indicator: &'static str,
        period: usize,
    },

    #[error("multiplier must be positive, got {value}")]
    InvalidMultiplier { value: Decimal },

    #[error("{indicator} length is required")]
    MissingLength { indicator: &'static str },

    #[error("bars out of chronological order at index {index}: {current} does not follow {previous}")]
    UnorderedBars {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    #[error("negative variance in window ending at index {index}")]
    NegativeVariance { index: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IndicatorError>;
