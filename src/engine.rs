use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    BbOutput, MacdOutput, ObvOutput, Ohlcv, Price, Result, Series, SupertrendOutput, atr,
    bollinger_bands, ensure_chronological, macd, obv, rsi, sma, supertrend,
};

/// SMA periods of the bundle, keyed as `sma_<period>`.
pub const SMA_PERIODS: [usize; 3] = [20, 50, 200];
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: Decimal = Decimal::TWO;
pub const SUPERTREND_PERIOD: usize = 10;
pub const SUPERTREND_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

/// Every indicator the chart layer draws, computed over one bar
/// sequence with the fixed parameter set above.
///
/// Each series is aligned to the input bars. Serializes to a JSON object
/// keyed by indicator name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorBundle {
    pub sma_20: Series<Price>,
    pub sma_50: Series<Price>,
    pub sma_200: Series<Price>,
    pub bb: BbOutput,
    pub supertrend: SupertrendOutput,
    pub macd: MacdOutput,
    pub rsi: Series<Price>,
    pub atr: Series<Price>,
    pub obv: ObvOutput,
}

impl IndicatorBundle {
    /// Number of bars the bundle was computed over.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }
}

/// Computes the full indicator bundle for `bars`.
///
/// Bars must be in strictly increasing date order; this is checked
/// before anything is computed. Short inputs are fine and simply leave
/// the longer indicators undefined.
///
/// # Errors
///
/// Returns [`IndicatorError::UnorderedBars`](crate::IndicatorError::UnorderedBars)
/// if dates are not strictly increasing, and otherwise propagates the
/// first error raised by an indicator.
///
/// # Example
///
/// ```
/// use quantedge_series::{Bar, compute_indicators};
/// use rust_decimal::Decimal;
/// # use chrono::{TimeZone, Utc, TimeDelta};
/// # let day = |n| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n);
///
/// let bars: Vec<Bar> = (0..30)
///     .map(|n| {
///         let c = Decimal::from(100 + n % 7);
///         Bar::new(day(n), c, c + Decimal::ONE, c - Decimal::ONE, c, Decimal::from(1_000))
///     })
///     .collect();
///
/// let bundle = compute_indicators(&bars)?;
///
/// assert_eq!(bundle.len(), 30);
/// assert!(bundle.sma_20.last_value().is_some());
/// assert_eq!(bundle.sma_50.defined_count(), 0);
/// # Ok::<(), quantedge_series::IndicatorError>(())
/// ```
#[instrument(skip_all, fields(bars = bars.len()))]
pub fn compute_indicators(bars: &[impl Ohlcv]) -> Result<IndicatorBundle> {
    ensure_chronological(bars).inspect_err(|err| warn!(%err, "rejecting bar sequence"))?;

    let [short, medium, long] = SMA_PERIODS;

    let bundle = IndicatorBundle {
        sma_20: sma(bars, short)?,
        sma_50: sma(bars, medium)?,
        sma_200: sma(bars, long)?,
        bb: bollinger_bands(bars, BB_PERIOD, BB_STD_DEV)?,
        supertrend: supertrend(bars, SUPERTREND_PERIOD, SUPERTREND_MULTIPLIER)?,
        macd: macd(bars, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?,
        rsi: rsi(bars, RSI_PERIOD)?,
        atr: atr(bars, ATR_PERIOD)?,
        obv: obv(bars),
    };

    debug!(
        rsi = ?bundle.rsi.last_value(),
        trend = ?bundle.supertrend.direction.last(),
        "indicators computed"
    );

    Ok(bundle)
}
