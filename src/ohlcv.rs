use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{IndicatorError, Result};

/// A price value.
///
/// Semantic alias for [`Decimal`]. Every recurrence in the crate carries
/// state bar-by-bar, so prices stay in fixed-point decimal end to end.
pub type Price = Decimal;

/// Bar date.
pub type Timestamp = DateTime<Utc>;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own quote type to avoid conversion. Indicators
/// accept `&[impl Ohlcv]` and extract what they need internally.
///
/// # Ordering
///
/// Indicators assume the slice is sorted by strictly increasing
/// [`date`](Ohlcv::date) and do not check it. Use
/// [`ensure_chronological`] at the boundary, or go through
/// [`compute_indicators`](crate::compute_indicators), which does.
///
/// # Example
///
/// ```
/// use quantedge_series::{Ohlcv, Price, Timestamp};
///
/// struct MyQuote {
///     o: Price, h: Price, l: Price, c: Price, v: Price,
///     ts: Timestamp,
/// }
///
/// impl Ohlcv for MyQuote {
///     fn date(&self) -> Timestamp { self.ts }
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> Price { self.v }
/// }
/// ```
pub trait Ohlcv {
    /// Bar date.
    fn date(&self) -> Timestamp;

    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Traded volume during the bar. Defaults to zero.
    ///
    /// Only volume-based indicators (OBV) read it.
    fn volume(&self) -> Decimal {
        Decimal::ZERO
    }
}

/// Immutable daily quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub date: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Decimal,
}

impl Bar {
    #[must_use]
    pub fn new(
        date: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for Bar {
    fn date(&self) -> Timestamp {
        self.date
    }

    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> Decimal {
        self.volume
    }
}

/// Checks that bar dates are strictly increasing.
///
/// # Errors
///
/// Returns [`IndicatorError::UnorderedBars`] at the first bar whose date
/// does not follow its predecessor's.
pub fn ensure_chronological(bars: &[impl Ohlcv]) -> Result<()> {
    bars.windows(2)
        .enumerate()
        .find(|(_, pair)| pair[1].date() <= pair[0].date())
        .map_or(Ok(()), |(i, pair)| {
            Err(IndicatorError::UnorderedBars {
                index: i + 1,
                previous: pair[0].date(),
                current: pair[1].date(),
            })
        })
}
