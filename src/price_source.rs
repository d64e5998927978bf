use crate::{Ohlcv, Price};

use rust_decimal::Decimal;
use std::fmt::{Debug, Display};

/// Price source extracted from an [`Ohlcv`] bar before feeding into an
/// indicator.
///
/// Each price-based indicator is configured with a `PriceSource` that
/// determines which value (or derived value) to compute on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

const THREE: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const FOUR: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Close => ohlcv.close(),
            Self::Low => ohlcv.low(),
            Self::HL2 => (ohlcv.high() + ohlcv.low()) / Decimal::TWO,
            Self::HLC3 => (ohlcv.high() + ohlcv.low() + ohlcv.close()) / THREE,
            Self::OHLC4 => (ohlcv.open() + ohlcv.high() + ohlcv.low() + ohlcv.close()) / FOUR,
            Self::HLCC4 => (ohlcv.high() + ohlcv.low() + ohlcv.close() + ohlcv.close()) / FOUR,
        }
    }

    /// Extracts this source from every bar.
    pub(crate) fn series(self, bars: &[impl Ohlcv]) -> Vec<Price> {
        bars.iter().map(|bar| self.extract(bar)).collect()
    }
}
