use crate::Price;

use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Trailing window of the last `size` values with a running sum.
///
/// Decimal addition and subtraction are exact, so the running sum never
/// drifts from the direct windowed sum.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    size: usize,
    window: VecDeque<Price>,
    sum: Price,
    size_decimal: Decimal,
}

impl PriceWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: Decimal::ZERO,
            size_decimal: Decimal::from(size),
        }
    }

    /// Appends `price`, evicting the oldest value once the window is full.
    #[inline]
    pub fn push(&mut self, price: Price) {
        if self.is_ready()
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
        }

        self.window.push_back(price);
        self.sum += price;
    }

    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then_some(self.sum)
    }

    /// Arithmetic mean of the window, once full.
    #[inline]
    pub fn mean(&self) -> Option<Price> {
        self.sum().map(|sum| sum / self.size_decimal)
    }

    /// Mean and population variance (divide by `size`), once full.
    pub fn mean_and_variance(&self) -> Option<(Price, Price)> {
        let mean = self.mean()?;
        let squared: Price = self
            .window
            .iter()
            .map(|&price| {
                let diff = price - mean;
                diff * diff
            })
            .sum();

        Some((mean, squared / self.size_decimal))
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}
