#![allow(dead_code)]

use chrono::{TimeDelta, TimeZone, Utc};
use quantedge_series::{Bar, Price, Series, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Daily bar as stored in the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
struct FixtureBar {
    date: Timestamp,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
}

impl FixtureBar {
    fn into_bar(self) -> Bar {
        let price = |field: &str, raw: &str| {
            Decimal::from_str(raw).unwrap_or_else(|e| panic!("invalid {field} {raw:?}: {e}"))
        };

        Bar::new(
            self.date,
            price("open", &self.open),
            price("high", &self.high),
            price("low", &self.low),
            price("close", &self.close),
            price("volume", &self.volume),
        )
    }
}

const DAILY_BARS_PATH: &str = "tests/fixtures/data/daily-bars.csv";

/// Load one year of daily bars, oldest first.
pub fn load_daily_bars() -> Vec<Bar> {
    let mut reader = csv::Reader::from_path(DAILY_BARS_PATH)
        .unwrap_or_else(|e| panic!("failed to open {DAILY_BARS_PATH}: {e}"));

    reader
        .deserialize::<FixtureBar>()
        .map(|r| r.expect("invalid daily bar record").into_bar())
        .collect()
}

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Midnight UTC, `n` days after 2024-01-01.
pub fn day(n: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(n)
}

/// Flat bars (open = high = low = close) on consecutive days.
pub fn flat_bars(closes: &[i64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(0..)
        .map(|(&c, n)| {
            let c = Decimal::from(c);
            Bar::new(day(n), c, c, c, c, Decimal::ZERO)
        })
        .collect()
}

/// Assert two decimals agree to within `1e-20`.
pub fn assert_near(actual: Price, expected: Price, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff < Decimal::new(1, 20),
        "{context}: actual={actual}, expected={expected}, diff={diff}"
    );
}

/// Assert that once `series` becomes defined it stays defined.
pub fn assert_monotonic<T>(series: &Series<T>, name: &str) {
    if let Some(start) = series.first_defined() {
        let gap = series.iter().skip(start).position(Option::is_none);
        assert!(
            gap.is_none(),
            "{name}: defined from {start} but undefined again at {}",
            start + gap.unwrap_or_default()
        );
    }
}
