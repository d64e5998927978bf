use std::fmt::Display;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Ohlcv, Price, Series};

/// Magnitude used to label and scale an OBV panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VolumeUnit {
    #[serde(rename = "")]
    Units,
    #[serde(rename = "K")]
    Thousands,
    #[serde(rename = "M")]
    Millions,
    #[serde(rename = "B")]
    Billions,
}

impl VolumeUnit {
    /// Largest unit not exceeding `magnitude`.
    #[must_use]
    pub fn for_magnitude(magnitude: Decimal) -> Self {
        [Self::Billions, Self::Millions, Self::Thousands]
            .into_iter()
            .find(|unit| magnitude >= unit.scale())
            .unwrap_or(Self::Units)
    }

    #[must_use]
    pub fn scale(self) -> Decimal {
        match self {
            Self::Units => Decimal::ONE,
            Self::Thousands => Decimal::ONE_THOUSAND,
            Self::Millions => Decimal::from(1_000_000),
            Self::Billions => Decimal::from(1_000_000_000),
        }
    }

    /// Axis suffix: empty, `K`, `M`, or `B`.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Units => "",
            Self::Thousands => "K",
            Self::Millions => "M",
            Self::Billions => "B",
        }
    }
}

impl Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// On-Balance Volume output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObvOutput {
    /// Running volume total; defined on every bar.
    pub obv: Series<Price>,
    /// `obv / unit.scale()`.
    pub normalized: Series<Price>,
    pub unit: VolumeUnit,
}

/// On-Balance Volume (OBV).
///
/// Starts at zero on the first bar, then adds the bar's volume when the
/// close rises, subtracts it when the close falls, and carries the total
/// when the close is unchanged.
///
/// The unit is chosen from the largest absolute total, so a chart axis
/// can show `12.5M` instead of `12500000`.
pub fn obv(bars: &[impl Ohlcv]) -> ObvOutput {
    let mut total = Decimal::ZERO;
    let mut peak = Decimal::ZERO;

    let values: Vec<Price> = std::iter::once(Decimal::ZERO)
        .chain(bars.windows(2).map(|pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            match bar.close().cmp(&prev.close()) {
                std::cmp::Ordering::Greater => total += bar.volume(),
                std::cmp::Ordering::Less => total -= bar.volume(),
                std::cmp::Ordering::Equal => {}
            }
            peak = peak.max(total.abs());
            total
        }))
        .take(bars.len())
        .collect();

    let unit = VolumeUnit::for_magnitude(peak);
    let scale = unit.scale();

    ObvOutput {
        normalized: values.iter().map(|&v| Some(v / scale)).collect(),
        obv: values.into_iter().map(Some).collect(),
        unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, test_util::day};
    use rust_decimal_macros::dec;

    fn traded(close: Price, volume: Price, n: i64) -> Bar {
        Bar::new(day(n), close, close, close, close, volume)
    }

    mod accumulation {
        use super::*;

        #[test]
        fn empty_input() {
            let out = obv(&Vec::<Bar>::new());
            assert!(out.obv.is_empty());
            assert_eq!(out.unit, VolumeUnit::Units);
        }

        #[test]
        fn starts_at_zero() {
            let out = obv(&[traded(dec!(10), dec!(500), 0)]);
            assert_eq!(out.obv[0], Some(dec!(0)));
        }

        #[test]
        fn adds_on_up_subtracts_on_down_carries_on_flat() {
            let input = [
                traded(dec!(10), dec!(100), 0),
                traded(dec!(11), dec!(40), 1),
                traded(dec!(9), dec!(70), 2),
                traded(dec!(9), dec!(999), 3),
                traded(dec!(12), dec!(5), 4),
            ];
            let out = obv(&input);
            let expected: Vec<_> = [0, 40, -30, -30, -25]
                .into_iter()
                .map(|v| Some(Decimal::from(v)))
                .collect();
            assert_eq!(out.obv.as_slice(), expected.as_slice());
            assert_eq!(out.obv.defined_count(), input.len());
        }
    }

    mod units {
        use super::*;

        #[test]
        fn chosen_by_largest_magnitude() {
            assert_eq!(VolumeUnit::for_magnitude(dec!(999)), VolumeUnit::Units);
            assert_eq!(VolumeUnit::for_magnitude(dec!(1000)), VolumeUnit::Thousands);
            assert_eq!(VolumeUnit::for_magnitude(dec!(2500000)), VolumeUnit::Millions);
            assert_eq!(VolumeUnit::for_magnitude(dec!(7000000000)), VolumeUnit::Billions);
        }

        #[test]
        fn negative_totals_count_by_magnitude() {
            let input = [
                traded(dec!(10), dec!(0), 0),
                traded(dec!(9), dec!(3000000), 1),
                traded(dec!(10), dec!(500000), 2),
            ];
            let out = obv(&input);
            assert_eq!(out.unit, VolumeUnit::Millions);
            assert_eq!(out.normalized[1], Some(dec!(-3)));
            assert_eq!(out.normalized[2], Some(dec!(-2.5)));
        }

        #[test]
        fn serializes_as_suffix() {
            assert_eq!(serde_json::to_string(&VolumeUnit::Thousands).unwrap(), "\"K\"");
            assert_eq!(serde_json::to_string(&VolumeUnit::Units).unwrap(), "\"\"");
            assert_eq!(VolumeUnit::Billions.to_string(), "B");
        }
    }
}
