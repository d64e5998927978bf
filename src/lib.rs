//! Batch technical analysis over decimal OHLCV series.
//!
//! Indicators read a chronologically ordered slice of bars (anything
//! implementing [`Ohlcv`]) and return [`Series`] aligned bar-for-bar
//! with the input. Positions an indicator cannot yet define are `None`,
//! never a zero or a placeholder. All arithmetic is
//! [`Decimal`](rust_decimal::Decimal), so long recurrences do not drift.
//!
//! Each indicator type ([`Sma`], [`Ema`], [`Atr`], [`Bb`],
//! [`Supertrend`], [`Macd`], [`Rsi`]) exposes [`new`](Sma::new) and
//! [`compute`](Sma::compute) as inherent methods, no trait import
//! needed. Import [`Indicator`] only for generic code. Plain functions
//! ([`sma`], [`macd`], …) cover the common close-price case, and
//! [`compute_indicators`] produces the whole chart bundle in one call.
//!
//! ```
//! use quantedge_series::{Bar, rsi, sma};
//! use rust_decimal::Decimal;
//! # use chrono::{TimeZone, Utc, TimeDelta};
//! # let day = |n| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n);
//!
//! let bars: Vec<Bar> = [10, 11, 12, 11, 13]
//!     .into_iter()
//!     .zip(0..)
//!     .map(|(c, n)| {
//!         let c = Decimal::from(c);
//!         Bar::new(day(n), c, c, c, c, Decimal::ZERO)
//!     })
//!     .collect();
//!
//! let averages = sma(&bars, 3)?;
//! assert_eq!(averages[1], None);
//! assert_eq!(averages[2], Some(Decimal::from(11)));
//!
//! assert_eq!(rsi(&bars, 14)?.defined_count(), 0);
//! # Ok::<(), quantedge_series::IndicatorError>(())
//! ```

mod atr;
mod bb;
mod ema;
mod engine;
mod error;
mod indicator;
mod macd;
mod obv;
mod ohlcv;
mod price_source;
mod price_window;
mod rsi;
mod series;
mod sma;
mod supertrend;

pub use crate::error::{IndicatorError, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder, Multiplier};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp, ensure_chronological};
pub use crate::price_source::PriceSource;
pub use crate::series::Series;

pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder, atr, true_range};
pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbOutput, bollinger_bands};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, ema};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdOutput, macd};
pub use crate::obv::{ObvOutput, VolumeUnit, obv};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, sma};
pub use crate::supertrend::{
    Supertrend, SupertrendConfig, SupertrendConfigBuilder, SupertrendOutput, TrendDirection,
    supertrend,
};

pub use crate::engine::{
    ATR_PERIOD, BB_PERIOD, BB_STD_DEV, IndicatorBundle, MACD_FAST, MACD_SIGNAL, MACD_SLOW,
    RSI_PERIOD, SMA_PERIODS, SUPERTREND_MULTIPLIER, SUPERTREND_PERIOD, compute_indicators,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            ///
            /// # Errors
            ///
            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> Result<$output> {
                <Self as Indicator>::compute(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Series<Price>);
impl_indicator_methods!(Ema, EmaConfig, Series<Price>);
impl_indicator_methods!(Atr, AtrConfig, Series<Price>);
impl_indicator_methods!(Bb, BbConfig, BbOutput);
impl_indicator_methods!(Supertrend, SupertrendConfig, SupertrendOutput);
impl_indicator_methods!(Macd, MacdConfig, MacdOutput);
impl_indicator_methods!(Rsi, RsiConfig, Series<Price>);

#[cfg(test)]
mod test_util;
