use std::{fmt::Display, num::NonZero};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
    Atr, AtrConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError,
    Multiplier, Ohlcv, Price, Result, Series, indicator::window_length,
};

/// Configuration for the [`Supertrend`] indicator.
///
/// # Example
///
/// ```
/// use quantedge_series::{IndicatorConfig, IndicatorConfigBuilder, SupertrendConfig};
/// use rust_decimal::Decimal;
/// use std::num::NonZero;
///
/// let config = SupertrendConfig::builder()
///     .length(NonZero::new(10).unwrap())
///     .build()?;
///
/// assert_eq!(config.multiplier().value(), Decimal::from(3));
/// assert_eq!(config.lookback(), 10);
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SupertrendConfig {
    length: usize,
    multiplier: Multiplier,
}

impl IndicatorConfig for SupertrendConfig {
    type Builder = SupertrendConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SupertrendConfigBuilder {
            length: None,
            multiplier: Multiplier::from_integer(3),
        }
    }

    /// The trend is seeded at bar `length`; bands follow one bar later.
    #[inline]
    fn lookback(&self) -> usize {
        self.length
    }
}

impl SupertrendConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>, multiplier: Multiplier) -> Self {
        Self {
            length: length.get(),
            multiplier,
        }
    }

    /// ATR length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// ATR multiplier for the basic bands.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
}

impl Display for SupertrendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SupertrendConfig({}, {})", self.length, self.multiplier)
    }
}

/// Builder for [`SupertrendConfig`].
///
/// Defaults: multiplier = `3`.
pub struct SupertrendConfigBuilder {
    length: Option<usize>,
    multiplier: Multiplier,
}

impl SupertrendConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }
}

impl IndicatorConfigBuilder<SupertrendConfig> for SupertrendConfigBuilder {
    fn build(self) -> Result<SupertrendConfig> {
        Ok(SupertrendConfig {
            length: self.length.ok_or(IndicatorError::MissingLength {
                indicator: "SuperTrend",
            })?,
            multiplier: self.multiplier,
        })
    }
}

/// Regime of the SuperTrend line at a bar.
///
/// Serializes as its signed integer: `1`, `-1`, or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendDirection {
    Up,
    Down,
    /// Warm-up: no trend has been established yet.
    #[default]
    Neutral,
}

impl TrendDirection {
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
            Self::Neutral => 0,
        }
    }
}

impl Serialize for TrendDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// SuperTrend output, aligned to the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupertrendOutput {
    /// Trend line level.
    #[serde(rename = "supertrend")]
    pub trend: Series<Price>,
    /// Regime per bar; [`TrendDirection::Neutral`] exactly where `trend`
    /// is undefined.
    pub direction: Vec<TrendDirection>,
    /// `hl2 + m × ATR`, defined from bar `length + 1`.
    pub upper_band: Series<Price>,
    /// `hl2 − m × ATR`, defined from bar `length + 1`.
    pub lower_band: Series<Price>,
}

impl SupertrendOutput {
    /// Trend line where the regime is up, undefined elsewhere.
    #[must_use]
    pub fn uptrend(&self) -> Series<Price> {
        self.regime(TrendDirection::Up)
    }

    /// Trend line where the regime is down, undefined elsewhere.
    #[must_use]
    pub fn downtrend(&self) -> Series<Price> {
        self.regime(TrendDirection::Down)
    }

    fn regime(&self, wanted: TrendDirection) -> Series<Price> {
        self.trend
            .iter()
            .zip(&self.direction)
            .map(|(trend, &direction)| trend.filter(|_| direction == wanted))
            .collect()
    }
}

/// SuperTrend.
///
/// A trailing stop line that follows price at a distance of `m × ATR`
/// from the bar midpoint and only ratchets in the direction of the
/// current regime:
///
/// ```text
/// upper = hl2 + m × ATR
/// lower = hl2 − m × ATR
///
/// up:   close < trend[i−1] → down, trend = lower
///       otherwise          → trend = max(lower, trend[i−1])
/// down: close > trend[i−1] → up,   trend = upper
///       otherwise          → trend = min(upper, trend[i−1])
/// ```
///
/// At bar `length` the line is seeded at the close in an up regime,
/// whatever the price action before it. Earlier bars are undefined
/// with a [`Neutral`](TrendDirection::Neutral) direction.
#[derive(Clone, Debug)]
pub struct Supertrend {
    config: SupertrendConfig,
}

impl Indicator for Supertrend {
    type Config = SupertrendConfig;
    type Output = SupertrendOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let seed_index = self.config.lookback();
        if bars.len() <= seed_index {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
        }

        let m = self.config.multiplier.value();
        let atr_length = window_length("SuperTrend", self.config.length)?;
        let atr = Atr::new(AtrConfig::new(atr_length)).compute(bars)?;

        let mut trend = Vec::with_capacity(bars.len());
        let mut direction = Vec::with_capacity(bars.len());
        let mut upper_band = Vec::with_capacity(bars.len());
        let mut lower_band = Vec::with_capacity(bars.len());

        let mut state: Option<(Price, TrendDirection)> = None;

        for (index, (bar, atr)) in bars.iter().zip(&atr).enumerate() {
            let (level, regime, bands) = match (state, *atr) {
                (Some((previous, regime)), Some(atr)) => {
                    let mid = (bar.high() + bar.low()) / Decimal::TWO;
                    let upper = mid + m * atr;
                    let lower = mid - m * atr;

                    let (level, regime) = step(regime, previous, bar.close(), upper, lower);
                    (Some(level), regime, Some((upper, lower)))
                }
                (None, _) if index == seed_index => {
                    (Some(bar.close()), TrendDirection::Up, None)
                }
                _ => (None, TrendDirection::Neutral, None),
            };

            state = level.map(|level| (level, regime));

            trend.push(level);
            direction.push(regime);
            upper_band.push(bands.map(|b| b.0));
            lower_band.push(bands.map(|b| b.1));
        }

        Ok(SupertrendOutput {
            trend: trend.into(),
            direction,
            upper_band: upper_band.into(),
            lower_band: lower_band.into(),
        })
    }
}

/// One transition of the regime state machine.
fn step(
    regime: TrendDirection,
    previous: Price,
    close: Price,
    upper: Price,
    lower: Price,
) -> (Price, TrendDirection) {
    match regime {
        TrendDirection::Down if close > previous => (upper, TrendDirection::Up),
        TrendDirection::Down => (upper.min(previous), TrendDirection::Down),
        // Neutral never carries: a defined level is always Up or Down.
        TrendDirection::Up | TrendDirection::Neutral if close < previous => {
            (lower, TrendDirection::Down)
        }
        TrendDirection::Up | TrendDirection::Neutral => (lower.max(previous), TrendDirection::Up),
    }
}

impl Display for Supertrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuperTrend({}, {})",
            self.config.length, self.config.multiplier
        )
    }
}

/// SuperTrend over an ATR of `period` bars with band multiplier
/// `multiplier`.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero and
/// [`IndicatorError::InvalidMultiplier`] if `multiplier` is not
/// positive.
pub fn supertrend(
    bars: &[impl Ohlcv],
    period: usize,
    multiplier: Decimal,
) -> Result<SupertrendOutput> {
    let config = SupertrendConfig::new(
        window_length("SuperTrend", period)?,
        Multiplier::new(multiplier)?,
    );
    Supertrend::new(config).compute(bars)
}
