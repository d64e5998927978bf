use std::{fmt::Display, num::NonZero};

use serde::Serialize;
use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, PriceSource,
    Result, Series, ema::ema_values, indicator::window_length,
};

/// Configuration for the Moving Average Convergence Divergence
/// ([`Macd`]) indicator.
///
/// # Example
///
/// ```
/// use quantedge_series::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast_length(NonZero::new(12).unwrap())
///     .slow_length(NonZero::new(26).unwrap())
///     .signal_length(NonZero::new(9).unwrap())
///     .build()?;
///
/// // slow EMA seeds at 25, signal EMA needs 9 MACD values
/// assert_eq!(config.lookback(), 33);
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast_length: usize,
    slow_length: usize,
    signal_length: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    /// First index of the signal line.
    #[inline]
    fn lookback(&self) -> usize {
        self.fast_length.max(self.slow_length) + self.signal_length - 2
    }
}

impl MacdConfig {
    #[inline]
    #[must_use]
    pub fn fast_length(&self) -> usize {
        self.fast_length
    }

    #[inline]
    #[must_use]
    pub fn slow_length(&self) -> usize {
        self.slow_length
    }

    #[inline]
    #[must_use]
    pub fn signal_length(&self) -> usize {
        self.signal_length
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// MACD on closing price.
    #[must_use]
    pub fn close(fast: NonZero<usize>, slow: NonZero<usize>, signal: NonZero<usize>) -> Self {
        Self {
            fast_length: fast.get(),
            slow_length: slow.get(),
            signal_length: signal.get(),
            source: PriceSource::Close,
        }
    }

    /// Fewest bars for which any output is produced.
    fn required_bars(&self) -> usize {
        self.fast_length + self.slow_length + self.signal_length
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast_length, self.slow_length, self.signal_length, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: source = [`PriceSource::Close`]. All three lengths must be
/// set.
pub struct MacdConfigBuilder {
    fast_length: Option<usize>,
    slow_length: Option<usize>,
    signal_length: Option<usize>,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast_length: None,
            slow_length: None,
            signal_length: None,
            source: PriceSource::Close,
        }
    }

    #[must_use]
    pub fn fast_length(mut self, length: NonZero<usize>) -> Self {
        self.fast_length.replace(length.get());
        self
    }

    #[must_use]
    pub fn slow_length(mut self, length: NonZero<usize>) -> Self {
        self.slow_length.replace(length.get());
        self
    }

    #[must_use]
    pub fn signal_length(mut self, length: NonZero<usize>) -> Self {
        self.signal_length.replace(length.get());
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    fn build(self) -> Result<MacdConfig> {
        let missing = IndicatorError::MissingLength { indicator: "MACD" };

        Ok(MacdConfig {
            fast_length: self.fast_length.ok_or(missing.clone())?,
            slow_length: self.slow_length.ok_or(missing.clone())?,
            signal_length: self.signal_length.ok_or(missing)?,
            source: self.source,
        })
    }
}

/// MACD output, aligned to the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacdOutput {
    /// `EMA(fast) − EMA(slow)`.
    pub macd: Series<Price>,
    /// EMA of the defined part of the MACD line.
    pub signal: Series<Price>,
    /// `macd − signal`.
    pub histogram: Series<Price>,
}

impl MacdOutput {
    fn undefined(len: usize) -> Self {
        Self {
            macd: Series::undefined(len),
            signal: Series::undefined(len),
            histogram: Series::undefined(len),
        }
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(signal) of the defined MACD values
/// histogram = macd − signal
/// ```
///
/// The signal EMA runs over the MACD line with its leading gap removed,
/// and its results are placed back at the positions they came from. So
/// the signal is first defined `signal − 1` bars after the MACD line.
///
/// With fewer than `fast + slow + signal` bars, all three lines are
/// left undefined.
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdOutput;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        if bars.len() < self.config.required_bars() {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
            return Ok(MacdOutput::undefined(bars.len()));
        }

        let prices = self.config.source.series(bars);
        let fast = ema_values(&prices, self.config.fast_length);
        let slow = ema_values(&prices, self.config.slow_length);
        let macd = fast.zip_with(&slow, |f, s| f - s);

        let (indices, line) = macd.compact();
        let smoothed = ema_values(&line, self.config.signal_length);
        let signal = Series::scatter(bars.len(), &indices, &smoothed);

        let histogram = macd.zip_with(&signal, |m, s| m - s);

        Ok(MacdOutput {
            macd,
            signal,
            histogram,
        })
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast_length,
            self.config.slow_length,
            self.config.signal_length,
            self.config.source
        )
    }
}

/// MACD over closes with the given EMA lengths.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if any length is zero.
pub fn macd(bars: &[impl Ohlcv], fast: usize, slow: usize, signal: usize) -> Result<MacdOutput> {
    let config = MacdConfig::close(
        window_length("MACD", fast)?,
        window_length("MACD", slow)?,
        window_length("MACD", signal)?,
    );
    Macd::new(config).compute(bars)
}
