use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, PriceSource,
    Result, Series, indicator::window_length,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use quantedge_series::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = EmaConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build()?;
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.lookback(), 19);
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn lookback(&self) -> usize {
        self.length - 1
    }
}

impl EmaConfig {
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

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the indicator window length.
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

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn build(self) -> Result<EmaConfig> {
        Ok(EmaConfig {
            length: self
                .length
                .ok_or(IndicatorError::MissingLength { indicator: "EMA" })?,
            source: self.source,
        })
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `k = 2 / (length + 1)`:
///
/// ```text
/// EMA[i] = (price[i] − EMA[i−1]) × k + EMA[i−1]
/// ```
///
/// The value at index `length − 1` is seeded with the SMA of the
/// first `length` prices; earlier positions are undefined. The
/// recurrence runs in decimal so per-step rounding does not compound
/// over long histories.
///
/// # Example
///
/// ```
/// use quantedge_series::{Ema, EmaConfig, Bar};
/// use rust_decimal::Decimal;
/// use std::num::NonZero;
/// # use chrono::{TimeZone, Utc, TimeDelta};
/// # let day = |n| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n);
/// # let flat = |c: i64, n| {
/// #     let c = Decimal::from(c);
/// #     Bar::new(day(n), c, c, c, c, Decimal::ZERO)
/// # };
///
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
/// let bars = [flat(2, 0), flat(4, 1), flat(6, 2), flat(8, 3)];
/// let series = ema.compute(&bars)?;
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4
/// assert_eq!(series[2], Some(Decimal::from(4)));
/// // k = 0.5: (8 − 4) × 0.5 + 4 = 6
/// assert_eq!(series[3], Some(Decimal::from(6)));
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Series<Price>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        if bars.len() < self.config.length {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
        }

        Ok(ema_values(
            &self.config.source.series(bars),
            self.config.length,
        ))
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

/// SMA-seeded EMA of `values`, aligned to the input.
///
/// Shared with MACD, which smooths its own derived line rather than a
/// bar price.
pub(crate) fn ema_values(values: &[Price], length: usize) -> Series<Price> {
    if values.len() < length {
        return Series::undefined(values.len());
    }

    let length_decimal = Decimal::from(length);
    let alpha = Decimal::TWO / (length_decimal + Decimal::ONE);
    let seed = values[..length].iter().copied().sum::<Price>() / length_decimal;

    let mut out = Vec::with_capacity(values.len());
    out.resize(length - 1, None);
    out.push(Some(seed));

    let mut previous = seed;
    for &price in &values[length..] {
        previous += (price - previous) * alpha;
        out.push(Some(previous));
    }

    out.into()
}

/// SMA-seeded exponential moving average of closes over `period` bars.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero.
pub fn ema(bars: &[impl Ohlcv], period: usize) -> Result<Series<Price>> {
    Ema::new(EmaConfig::close(window_length("EMA", period)?)).compute(bars)
}
