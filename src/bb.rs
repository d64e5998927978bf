use std::{fmt::Display, num::NonZero};

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Multiplier, Ohlcv, Price,
    PriceSource, Result, Series, indicator::window_length, price_window::PriceWindow,
};

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// Bollinger Bands use an SMA for the middle band. Like SMA, values are
/// exact once the window is full, there is no warm-up bias.
///
/// # Example
///
/// ```
/// use quantedge_series::{BbConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use rust_decimal::Decimal;
/// use std::num::NonZero;
///
/// // Default: close, 2 std devs
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build()?;
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.std_dev().value(), Decimal::from(2));
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    std_dev: Multiplier,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn lookback(&self) -> usize {
        self.length - 1
    }
}

impl BbConfig {
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> Multiplier {
        self.std_dev
    }

    /// BB with custom length and multiplier on close price.
    #[must_use]
    pub fn close(length: NonZero<usize>, std_dev: Multiplier) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
            std_dev,
        }
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length, self.source, self.std_dev
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `std_dev` = `2`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    std_dev: Multiplier,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            std_dev: Multiplier::from_integer(2),
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: Multiplier) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn build(self) -> Result<BbConfig> {
        Ok(BbConfig {
            length: self
                .length
                .ok_or(IndicatorError::MissingLength { indicator: "BB" })?,
            source: self.source,
            std_dev: self.std_dev,
        })
    }
}

/// Bollinger Bands output: upper, middle, and lower bands, each aligned
/// to the input.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
///
/// `σ` is the population standard deviation (divide by `length`) of the
/// same trailing window as the SMA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BbOutput {
    #[serde(rename = "sma")]
    pub middle: Series<Price>,
    #[serde(rename = "upper_band")]
    pub upper: Series<Price>,
    #[serde(rename = "lower_band")]
    pub lower: Series<Price>,
}

impl BbOutput {
    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide
    /// width indicates high volatility.
    #[must_use]
    pub fn width(&self) -> Series<Price> {
        self.upper.zip_with(&self.lower, |u, l| u - l)
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving
/// average (middle) with upper and lower bands offset by a configurable
/// number of standard deviations. All three are undefined wherever the
/// SMA is.
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        if bars.len() < self.config.length {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
        }

        let k = self.config.std_dev.value();
        let mut window = PriceWindow::new(self.config.length);

        let mut middle = Vec::with_capacity(bars.len());
        let mut upper = Vec::with_capacity(bars.len());
        let mut lower = Vec::with_capacity(bars.len());

        for (index, price) in self.config.source.series(bars).into_iter().enumerate() {
            window.push(price);

            let bands = match window.mean_and_variance() {
                Some((mean, variance)) => {
                    let sigma = variance
                        .sqrt()
                        .ok_or(IndicatorError::NegativeVariance { index })?;
                    let offset = k * sigma;

                    Some((mean + offset, mean, mean - offset))
                }
                None => None,
            };

            upper.push(bands.map(|b| b.0));
            middle.push(bands.map(|b| b.1));
            lower.push(bands.map(|b| b.2));
        }

        Ok(BbOutput {
            middle: middle.into(),
            upper: upper.into(),
            lower: lower.into(),
        })
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length, self.config.source, self.config.std_dev,
        )
    }
}

/// Bollinger Bands over closes: SMA(`period`) ± `std_dev` population
/// standard deviations.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero and
/// [`IndicatorError::InvalidMultiplier`] if `std_dev` is not positive.
pub fn bollinger_bands(bars: &[impl Ohlcv], period: usize, std_dev: Decimal) -> Result<BbOutput> {
    let config = BbConfig::close(window_length("BB", period)?, Multiplier::new(std_dev)?);
    Bb::new(config).compute(bars)
}
