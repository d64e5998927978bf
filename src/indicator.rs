use crate::{IndicatorError, Ohlcv, Result};

use rust_decimal::Decimal;
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    num::NonZero,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its
/// parameters (lengths, price source, multipliers). Configs are value
/// types: cheap to clone, compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Index of the first bar at which the indicator's primary output
    /// can be defined, given enough input.
    fn lookback(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Builds the config.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::MissingLength`] if a required length was
    /// never set.
    fn build(self) -> Result<Config>;
}

/// A batch technical indicator.
///
/// Indicators are pure: [`compute`](Indicator::compute) reads an
/// immutable bar slice and allocates fresh output aligned to it. No
/// state survives between calls, so one indicator value can be shared
/// across threads and reused for any number of symbols.
///
/// # Example
///
/// ```
/// use quantedge_series::{Bar, Indicator, IndicatorConfig, IndicatorConfigBuilder, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::builder().length(NonZero::new(3).unwrap()).build()?;
/// let sma = <Sma as Indicator>::new(config);
///
/// let bars: Vec<Bar> = Vec::new();
/// assert!(sma.compute(&bars)?.is_empty());
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. A [`Series`](crate::Series) for simple
    /// indicators, a struct of aligned series for composite ones.
    type Output: Send + Sync + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Computes the indicator over `bars`. Every output series has
    /// `bars.len()` positions.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic failures; too little input is not an error.
    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output>;
}

/// Positive multiplier applied to a volatility measure: standard
/// deviations for Bollinger Bands, ATRs for SuperTrend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Multiplier(Decimal);

impl Multiplier {
    /// Creates a new multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::InvalidMultiplier`] if `value` is zero or
    /// negative.
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(IndicatorError::InvalidMultiplier { value })
        }
    }

    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }

    pub(crate) const fn from_integer(value: u32) -> Self {
        Self(Decimal::from_parts(value, 0, 0, false, 0))
    }
}

impl Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts a raw period into a window length.
pub(crate) fn window_length(indicator: &'static str, period: usize) -> Result<NonZero<usize>> {
    NonZero::new(period).ok_or(IndicatorError::InvalidPeriod { indicator, period })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    mod multiplier {
        use super::*;

        #[test]
        fn accepts_positive() {
            assert_eq!(Multiplier::new(dec!(2.5)).unwrap().value(), dec!(2.5));
        }

        #[test]
        fn rejects_zero() {
            assert_eq!(
                Multiplier::new(Decimal::ZERO),
                Err(IndicatorError::InvalidMultiplier {
                    value: Decimal::ZERO
                })
            );
        }

        #[test]
        fn rejects_negative() {
            assert!(Multiplier::new(dec!(-1)).is_err());
        }

        #[test]
        fn integer_constructor_matches_decimal() {
            assert_eq!(Multiplier::from_integer(3), Multiplier::new(dec!(3)).unwrap());
        }

        #[test]
        fn displays_value() {
            assert_eq!(Multiplier::new(dec!(2)).unwrap().to_string(), "2");
        }
    }

    mod window_length {
        use super::*;

        #[test]
        fn positive_period_is_accepted() {
            assert_eq!(window_length("SMA", 20).unwrap().get(), 20);
        }

        #[test]
        fn zero_period_is_invalid_argument() {
            assert_eq!(
                window_length("ATR", 0),
                Err(IndicatorError::InvalidPeriod {
                    indicator: "ATR",
                    period: 0
                })
            );
        }
    }
}
