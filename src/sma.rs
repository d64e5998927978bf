use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, PriceSource,
    Result, Series, indicator::window_length, price_window::PriceWindow,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use quantedge_series::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.lookback(), 19);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn lookback(&self) -> usize {
        self.length - 1
    }
}

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source to extract from each bar.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    /// Sets the price source.
    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<SmaConfig> {
        Ok(SmaConfig {
            length: self
                .length
                .ok_or(IndicatorError::MissingLength { indicator: "SMA" })?,
            source: self.source,
        })
    }
}

/// Simple Moving Average (SMA).
///
/// `output[i]` is the unweighted mean of the source over bars
/// `i - length + 1 ..= i`. Positions before `length - 1` are undefined;
/// an input shorter than `length` yields an entirely undefined series.
///
/// Uses an exact decimal running sum, so each value equals the direct
/// windowed mean.
///
/// # Example
///
/// ```rust
/// use quantedge_series::{Sma, SmaConfig, Bar};
/// use rust_decimal::Decimal;
/// use std::num::NonZero;
/// # use chrono::{TimeZone, Utc, TimeDelta};
/// # let day = |n| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n);
/// # let flat = |c: i64, n| {
/// #     let c = Decimal::from(c);
/// #     Bar::new(day(n), c, c, c, c, Decimal::ZERO)
/// # };
///
/// let bars = [flat(10, 0), flat(20, 1), flat(30, 2)];
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let series = sma.compute(&bars)?;
///
/// assert_eq!(series[1], None);
/// assert_eq!(series[2], Some(Decimal::from(20)));
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Series<Price>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        if bars.len() < self.config.length {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
        }

        Ok(sma_values(
            &self.config.source.series(bars),
            self.config.length,
        ))
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

/// Trailing `length`-value mean of `values`, aligned to the input.
pub(crate) fn sma_values(values: &[Price], length: usize) -> Series<Price> {
    let mut window = PriceWindow::new(length);

    values
        .iter()
        .map(|&value| {
            window.push(value);
            window.mean()
        })
        .collect()
}

/// Simple moving average of closes over `period` bars.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero.
pub fn sma(bars: &[impl Ohlcv], period: usize) -> Result<Series<Price>> {
    Sma::new(SmaConfig::close(window_length("SMA", period)?)).compute(bars)
}
