use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, Result,
    Series, indicator::window_length, price_window::PriceWindow,
};

/// Configuration for the Average True Range ([`Atr`]) indicator.
///
/// # Example
///
/// ```
/// use quantedge_series::{AtrConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = AtrConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.lookback(), 15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    length: usize,
}

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AtrConfigBuilder { length: None }
    }

    /// The first true range is at bar 1, and the window never includes
    /// the current bar, so the first full window ends at bar `length`
    /// and is reported at bar `length + 1`.
    #[inline]
    fn lookback(&self) -> usize {
        self.length + 1
    }
}

impl AtrConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
        }
    }

    /// Number of true-range values averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({})", self.length)
    }
}

/// Builder for [`AtrConfig`].
pub struct AtrConfigBuilder {
    length: Option<usize>,
}

impl AtrConfigBuilder {
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }
}

impl IndicatorConfigBuilder<AtrConfig> for AtrConfigBuilder {
    fn build(self) -> Result<AtrConfig> {
        Ok(AtrConfig {
            length: self
                .length
                .ok_or(IndicatorError::MissingLength { indicator: "ATR" })?,
        })
    }
}

/// Average True Range (ATR).
///
/// Simple mean of the `length` true ranges *preceding* each bar:
///
/// ```text
/// ATR[i] = mean(TR[i − length] ..= TR[i − 1])
/// ```
///
/// The current bar's own true range is excluded. `TR[0]` does not
/// exist, so the first defined value is at index `length + 1`.
/// [`Supertrend`](crate::Supertrend) relies on this exact window.
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Series<Price>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        if bars.len() <= self.config.lookback() {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
        }

        let mut window = PriceWindow::new(self.config.length);

        Ok(true_range(bars)
            .into_iter()
            .map(|tr| {
                // Read before pushing: the window holds TR[i - length ..= i - 1].
                let atr = window.mean();
                if let Some(tr) = tr {
                    window.push(tr);
                }
                atr
            })
            .collect())
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.length)
    }
}

/// True range of every bar:
/// `max(high − low, |high − prev_close|, |low − prev_close|)`.
///
/// Undefined at index 0, which has no previous close.
pub fn true_range(bars: &[impl Ohlcv]) -> Series<Price> {
    std::iter::once(None)
        .chain(bars.windows(2).map(|pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            let prev_close = prev.close();

            let hl = bar.high() - bar.low();
            let hc = (bar.high() - prev_close).abs();
            let lc = (bar.low() - prev_close).abs();

            Some(hl.max(hc).max(lc))
        }))
        .take(bars.len())
        .collect()
}

/// Average true range over `period` preceding bars.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero.
pub fn atr(bars: &[impl Ohlcv], period: usize) -> Result<Series<Price>> {
    Atr::new(AtrConfig::new(window_length("ATR", period)?)).compute(bars)
}
