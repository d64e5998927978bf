mod fixtures;

use fixtures::{assert_monotonic, assert_near, flat_bars, init_tracing, load_daily_bars};
use quantedge_series::{
    Bar, IndicatorError, Ohlcv, SUPERTREND_PERIOD, TrendDirection, VolumeUnit, compute_indicators,
    ema, macd, rsi, sma, supertrend, true_range,
};
use rust_decimal::Decimal;

fn bars() -> Vec<Bar> {
    init_tracing();
    load_daily_bars()
}

#[test]
fn fixture_is_chronological() {
    let bars = bars();
    assert_eq!(bars.len(), 260);
    assert!(bars.windows(2).all(|w| w[0].date() < w[1].date()));
}

#[test]
fn every_output_matches_input_length() {
    let bars = bars();
    for n in [0, 1, 5, 20, 35, 120, bars.len()] {
        let b = compute_indicators(&bars[..n]).unwrap();
        let lengths = [
            b.sma_20.len(),
            b.sma_50.len(),
            b.sma_200.len(),
            b.bb.middle.len(),
            b.bb.upper.len(),
            b.bb.lower.len(),
            b.supertrend.trend.len(),
            b.supertrend.direction.len(),
            b.supertrend.upper_band.len(),
            b.supertrend.lower_band.len(),
            b.macd.macd.len(),
            b.macd.signal.len(),
            b.macd.histogram.len(),
            b.rsi.len(),
            b.atr.len(),
            b.obv.obv.len(),
            b.obv.normalized.len(),
        ];
        assert!(lengths.iter().all(|&len| len == n), "n = {n}: {lengths:?}");
    }
}

#[test]
fn every_output_is_monotonically_defined() {
    let b = compute_indicators(&bars()).unwrap();

    assert_monotonic(&b.sma_20, "sma_20");
    assert_monotonic(&b.sma_50, "sma_50");
    assert_monotonic(&b.sma_200, "sma_200");
    assert_monotonic(&b.bb.middle, "bb.middle");
    assert_monotonic(&b.bb.upper, "bb.upper");
    assert_monotonic(&b.bb.lower, "bb.lower");
    assert_monotonic(&b.supertrend.trend, "supertrend");
    assert_monotonic(&b.supertrend.upper_band, "supertrend.upper_band");
    assert_monotonic(&b.supertrend.lower_band, "supertrend.lower_band");
    assert_monotonic(&b.macd.macd, "macd");
    assert_monotonic(&b.macd.signal, "macd.signal");
    assert_monotonic(&b.macd.histogram, "macd.histogram");
    assert_monotonic(&b.rsi, "rsi");
    assert_monotonic(&b.atr, "atr");
}

#[test]
fn sma_is_undefined_when_input_shorter_than_period() {
    let bars = bars();
    for period in [1, 2, 7, 20, 50, 200] {
        for n in [0, period / 2, period - 1] {
            let out = sma(&bars[..n], period).unwrap();
            assert_eq!(out.len(), n);
            assert_eq!(out.defined_count(), 0, "period {period}, n {n}");
        }
    }
}

#[test]
fn ema_seed_is_mean_of_first_period_closes() {
    let bars = bars();
    for period in [1, 3, 12, 26, 50] {
        let out = ema(&bars, period).unwrap();
        let mean = bars[..period].iter().map(Ohlcv::close).sum::<Decimal>() / Decimal::from(period);

        assert_eq!(out[period - 1], Some(mean), "period {period}");
        assert_eq!(out.first_defined(), Some(period - 1));
    }
}

#[test]
fn supertrend_ratchet_holds_within_a_regime() {
    let bars = bars();
    let out = supertrend(&bars, SUPERTREND_PERIOD, Decimal::from(3)).unwrap();

    let mut checked = 0;
    for i in (SUPERTREND_PERIOD + 1)..bars.len() {
        let (prev, trend) = (out.trend[i - 1].unwrap(), out.trend[i].unwrap());
        let (upper, lower) = (out.upper_band[i].unwrap(), out.lower_band[i].unwrap());

        match (out.direction[i - 1], out.direction[i]) {
            (TrendDirection::Up, TrendDirection::Up) => {
                assert_eq!(trend, lower.max(prev), "bar {i}");
                assert!(trend >= lower, "bar {i}");
                checked += 1;
            }
            (TrendDirection::Down, TrendDirection::Down) => {
                assert_eq!(trend, upper.min(prev), "bar {i}");
                assert!(trend <= upper, "bar {i}");
                checked += 1;
            }
            (TrendDirection::Up, TrendDirection::Down) => assert_eq!(trend, lower, "bar {i}"),
            (TrendDirection::Down, TrendDirection::Up) => assert_eq!(trend, upper, "bar {i}"),
            other => panic!("unexpected transition {other:?} at bar {i}"),
        }
    }

    assert!(checked > 0);
}

#[test]
fn supertrend_direction_is_neutral_only_during_warmup() {
    let out = compute_indicators(&bars()).unwrap().supertrend;

    for (i, (trend, direction)) in out.trend.iter().zip(&out.direction).enumerate() {
        assert_eq!(
            trend.is_none(),
            *direction == TrendDirection::Neutral,
            "bar {i}"
        );
    }
    assert_eq!(out.direction[SUPERTREND_PERIOD], TrendDirection::Up);
    assert!(out.direction.iter().any(|d| *d == TrendDirection::Down));
}

#[test]
fn supertrend_regimes_partition_the_trend() {
    let out = compute_indicators(&bars()).unwrap().supertrend;
    let (up, down) = (out.uptrend(), out.downtrend());

    for i in 0..out.trend.len() {
        assert_eq!(up[i].or(down[i]), out.trend[i], "bar {i}");
        assert!(up[i].is_none() || down[i].is_none(), "bar {i}");
    }
}

#[test]
fn macd_histogram_is_line_minus_signal() {
    let out = macd(&bars(), 12, 26, 9).unwrap();

    for i in 0..out.macd.len() {
        match (out.macd[i], out.signal[i], out.histogram[i]) {
            (Some(m), Some(s), Some(h)) => assert_near(h, m - s, &format!("bar {i}")),
            (_, None, None) | (None, _, None) => {}
            other => panic!("histogram defined without both inputs at bar {i}: {other:?}"),
        }
    }
    assert_eq!(out.macd.first_defined(), Some(25));
    assert_eq!(out.signal.first_defined(), Some(33));
}

#[test]
fn rsi_stays_within_bounds() {
    let out = rsi(&bars(), 14).unwrap();
    for value in out.iter().flatten() {
        assert!(*value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED, "{value}");
    }
    assert_eq!(out.first_defined(), Some(14));
}

#[test]
fn rsi_is_exactly_hundred_without_losses() {
    let rising: Vec<i64> = (0..30).map(|i| 100 + i * i).collect();
    let out = rsi(&flat_bars(&rising), 14).unwrap();
    assert!(out.iter().skip(14).all(|v| *v == Some(Decimal::ONE_HUNDRED)));
}

#[test]
fn bollinger_bands_bracket_the_middle() {
    let b = compute_indicators(&bars()).unwrap();

    assert_eq!(b.bb.middle, b.sma_20);
    for i in 0..b.bb.middle.len() {
        if let (Some(u), Some(m), Some(l)) = (b.bb.upper[i], b.bb.middle[i], b.bb.lower[i]) {
            assert!(l <= m && m <= u, "bar {i}");
        }
    }
}

#[test]
fn atr_is_non_negative_and_trails_true_range() {
    let bars = bars();
    let b = compute_indicators(&bars).unwrap();
    let tr = true_range(&bars);

    assert_eq!(b.atr.first_defined(), Some(15));
    for i in 15..bars.len() {
        let window: Decimal = (i - 14..i).map(|j| tr[j].unwrap()).sum();
        assert_near(b.atr[i].unwrap(), window / Decimal::from(14), &format!("bar {i}"));
        assert!(b.atr[i].unwrap() >= Decimal::ZERO);
    }
}

#[test]
fn obv_normalization_matches_unit() {
    let b = compute_indicators(&bars()).unwrap();

    assert_eq!(b.obv.obv[0], Some(Decimal::ZERO));
    assert_ne!(b.obv.unit, VolumeUnit::Units);
    let scale = b.obv.unit.scale();
    for (raw, normalized) in b.obv.obv.iter().zip(&b.obv.normalized) {
        assert_near(normalized.unwrap() * scale, raw.unwrap(), "normalized");
    }
}

#[test]
fn aggregator_rejects_reversed_input() {
    let mut bars = bars();
    bars.reverse();

    assert!(matches!(
        compute_indicators(&bars),
        Err(IndicatorError::UnorderedBars { index: 1, .. })
    ));
}

#[test]
fn bundle_serializes_with_null_gaps() {
    let b = compute_indicators(&bars()).unwrap();
    let json = serde_json::to_value(&b).unwrap();

    assert!(json["sma_200"][198].is_null());
    assert!(json["sma_200"][199].is_string());
    assert!(json["bb"]["upper_band"][0].is_null());
    assert!(json["supertrend"]["supertrend"][9].is_null());
    assert_eq!(json["supertrend"]["direction"][10], 1);
    assert!(json["macd"]["histogram"][32].is_null());
    assert!(json["macd"]["histogram"][33].is_string());
    assert_eq!(json["obv"]["obv"][0], "0");
}

#[test]
fn bundle_survives_long_rally_after_single_dip() {
    let mut closes = vec![1000, 999];
    closes.extend((1..1200).map(|i| 1000 + i * 100));
    let b = compute_indicators(&flat_bars(&closes)).unwrap();

    assert_eq!(b.rsi.first_defined(), Some(14));
    assert_monotonic(&b.rsi, "rsi");
    for value in b.rsi.iter().flatten() {
        assert!(*value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED, "{value}");
    }
}
