use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An indicator output aligned bar-for-bar with its input.
///
/// `series[i]` belongs to `bars[i]`. Positions before an indicator's
/// lookback hold `None`, an explicit gap: never a zero, never a
/// placeholder. Serializes as a JSON array with `null` for gaps, which
/// chart consumers must draw as breaks in the line.
///
/// # Example
///
/// ```
/// use quantedge_series::Series;
///
/// let series: Series<i32> = [None, Some(1), Some(2)].into_iter().collect();
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.first_defined(), Some(1));
/// assert_eq!(series.last_value(), Some(&2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series<T>(Vec<Option<T>>);

impl<T> Series<T> {
    /// A series of `len` undefined positions.
    #[must_use]
    pub fn undefined(len: usize) -> Self {
        Self(std::iter::repeat_with(|| None).take(len).collect())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, or `None` when undefined or out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<T>> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<T>] {
        &self.0
    }

    /// Index of the first defined position.
    #[must_use]
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// Value at the final position, if defined.
    #[must_use]
    pub fn last_value(&self) -> Option<&T> {
        self.0.last().and_then(Option::as_ref)
    }

    /// `true` when no defined position is followed by an undefined one.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.first_defined()
            .is_none_or(|start| self.0[start..].iter().all(Option::is_some))
    }

    /// Applies `f` to every defined value, keeping gaps in place.
    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Series<U> {
        Series(self.0.iter().map(|v| v.as_ref().map(&mut f)).collect())
    }

    /// Combines two aligned series; a position is defined only where both
    /// inputs are.
    ///
    /// # Panics
    ///
    /// Panics if the series lengths differ.
    #[must_use]
    pub fn zip_with<U, R>(&self, other: &Series<U>, mut f: impl FnMut(&T, &U) -> R) -> Series<R> {
        assert_eq!(self.len(), other.len(), "series must be aligned");

        Series(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => Some(f(a, b)),
                    _ => None,
                })
                .collect(),
        )
    }
}

impl<T: Copy> Series<T> {
    /// Splits the series into its defined subsequence and the original
    /// index of each element.
    ///
    /// The inverse operation, mapping a derived subsequence back to the
    /// original positions, is [`Series::scatter`].
    #[must_use]
    pub fn compact(&self) -> (Vec<usize>, Vec<T>) {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .unzip()
    }

    /// Places `values[j]` at position `indices[j]` of a series of length
    /// `len`; every other position is undefined.
    pub(crate) fn scatter(len: usize, indices: &[usize], values: &Series<T>) -> Self {
        debug_assert_eq!(indices.len(), values.len());

        let mut out = vec![None; len];
        for (&index, value) in indices.iter().zip(values.iter()) {
            out[index] = *value;
        }

        Self(out)
    }
}

impl<T> From<Vec<Option<T>>> for Series<T> {
    fn from(values: Vec<Option<T>>) -> Self {
        Self(values)
    }
}

impl<T> FromIterator<Option<T>> for Series<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for Series<T> {
    type Output = Option<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> IntoIterator for Series<T> {
    type Item = Option<T>;
    type IntoIter = std::vec::IntoIter<Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Series<T> {
    type Item = &'a Option<T>;
    type IntoIter = std::slice::Iter<'a, Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
