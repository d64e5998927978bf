// src/test_util.rs

use crate::{Bar, Price, Series, Timestamp};

use chrono::{TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::num::NonZero;

/// Asserts that two `Decimal` values agree to within `1e-20`.
///
/// Divisions round at 28 significant digits, so derived values can differ
/// from a hand-written expectation in the last place.
macro_rules! assert_near {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (rust_decimal::Decimal, rust_decimal::Decimal) = ($actual, $expected);
        assert!(
            (a - e).abs() < rust_decimal_macros::dec!(0.00000000000000000001),
            "assert_near failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_near;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

/// Midnight UTC, `n` days after 2024-01-01.
pub fn day(n: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n)
}

/// Bar with OHLC all equal to `close`, dated `n` days in.
pub fn bar(close: Price, n: i64) -> Bar {
    ohlc(close, close, close, close, n)
}

pub fn ohlc(open: Price, high: Price, low: Price, close: Price, n: i64) -> Bar {
    Bar::new(day(n), open, high, low, close, Decimal::ZERO)
}

/// One flat bar per close, on consecutive days.
pub fn bars(closes: &[Price]) -> Vec<Bar> {
    closes
        .iter()
        .zip(0..)
        .map(|(&close, n)| bar(close, n))
        .collect()
}

/// Convenience: decimal closes from integers.
pub fn closes(values: &[i64]) -> Vec<Price> {
    values.iter().map(|&v| Decimal::from(v)).collect()
}

/// Bars with a ±1 high/low range around each close.
pub fn ranged_bars(closes: &[Price]) -> Vec<Bar> {
    closes
        .iter()
        .zip(0..)
        .map(|(&close, n)| ohlc(close, close + dec!(1), close - dec!(1), close, n))
        .collect()
}

/// Expected series from optional decimals.
pub fn series(values: &[Option<Price>]) -> Series<Price> {
    values.iter().copied().collect()
}
