use std::{fmt::Display, num::NonZero};

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, PriceSource,
    Result, Series, indicator::window_length,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at bar `length`.
///
/// # Example
///
/// ```
/// use quantedge_series::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.lookback(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn lookback(&self) -> usize {
        self.length
    }
}

impl RsiConfig {
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

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
            source: PriceSource::Close,
        }
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
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
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> Result<RsiConfig> {
        Ok(RsiConfig {
            length: self
                .length
                .ok_or(IndicatorError::MissingLength { indicator: "RSI" })?,
            source: self.source,
        })
    }
}

/// Wilder-smoothed average gain and loss.
#[derive(Clone, Copy, Debug)]
struct Averages {
    gain: Price,
    loss: Price,
}

impl Averages {
    /// Simple means of the seed changes.
    fn seed(changes: &[Price]) -> Self {
        let length = Decimal::from(changes.len());
        let (gain, loss) = changes
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(gain, loss), &change| {
                (gain + gain_of(change), loss + loss_of(change))
            });

        Self {
            gain: gain / length,
            loss: loss / length,
        }
    }

    fn smooth(&mut self, change: Price, length: Decimal) {
        let carry = length - Decimal::ONE;
        self.gain = (self.gain * carry + gain_of(change)) / length;
        self.loss = (self.loss * carry + loss_of(change)) / length;
    }

    fn rsi(self) -> Price {
        if self.loss.is_zero() {
            return HUNDRED;
        }

        // Equal to 100 − 100 / (1 + gain / loss), but the ratio stays
        // within [0, 1] when a long run of gains shrinks `loss` towards
        // the smallest representable decimal.
        HUNDRED * (self.gain / (self.gain + self.loss))
    }
}

#[inline]
fn gain_of(change: Price) -> Price {
    change.max(Decimal::ZERO)
}

#[inline]
fn loss_of(change: Price) -> Price {
    (-change).max(Decimal::ZERO)
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed). After each emitted value the averages absorb
/// the change into the next bar with Wilder's method:
///
/// ```text
/// avg_gain = (avg_gain × (length − 1) + gain) / length
/// avg_loss = (avg_loss × (length − 1) + loss) / length
/// RSI      = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// RSI is exactly `100` whenever the average loss is zero. Bars before
/// `length` are undefined, as is the whole series when there are not
/// more than `length` bars.
///
/// # Example
///
/// ```
/// use quantedge_series::{Bar, Rsi, RsiConfig};
/// use rust_decimal::Decimal;
/// use std::num::NonZero;
/// # use chrono::{TimeZone, Utc, TimeDelta};
/// # let day = |n| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n);
/// # let flat = |c: i64, n| {
/// #     let c = Decimal::from(c);
/// #     Bar::new(day(n), c, c, c, c, Decimal::ZERO)
/// # };
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
/// let bars = [flat(10, 0), flat(12, 1), flat(11, 2), flat(13, 3)];
/// let series = rsi.compute(&bars)?;
///
/// // changes = +2, −1, +2 → avg_gain = 4/3, avg_loss = 1/3 → RSI = 80
/// assert_eq!(series[2], None);
/// assert_eq!(series[3].map(|v| v.round_dp(6)), Some(Decimal::from(80)));
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Series<Price>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let length = self.config.length;
        if bars.len() <= length {
            debug!(indicator = %self, bars = bars.len(), "not enough bars, series left undefined");
            return Ok(Series::undefined(bars.len()));
        }

        // changes[j] is the move from bar j into bar j + 1.
        let changes: Vec<Price> = self
            .config
            .source
            .series(bars)
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect();

        let length_decimal = Decimal::from(length);
        let mut averages = Averages::seed(&changes[..length]);

        let mut out = Vec::with_capacity(bars.len());
        out.resize(length, None);

        for index in length..bars.len() {
            out.push(Some(averages.rsi()));

            if let Some(&change) = changes.get(index) {
                averages.smooth(change, length_decimal);
            }
        }

        Ok(out.into())
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

/// Wilder RSI of closes over `period` changes.
///
/// # Errors
///
/// Returns [`IndicatorError::InvalidPeriod`] if `period` is zero.
pub fn rsi(bars: &[impl Ohlcv], period: usize) -> Result<Series<Price>> {
    Rsi::new(RsiConfig::close(window_length("RSI", period)?)).compute(bars)
}
