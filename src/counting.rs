//! Counting sort for element types with a small value domain.

use crate::Element;

/// An element type whose values map monotonically onto `0..DOMAIN`.
pub(crate) trait CountingKey: Element {
    /// Number of distinct values.
    const DOMAIN: usize;

    /// Position of `self` in ascending value order.
    fn index(self) -> usize;

    /// Inverse of [`CountingKey::index`].
    fn from_index(index: usize) -> Self;
}

impl CountingKey for i8 {
    const DOMAIN: usize = 1 << 8;

    #[inline]
    fn index(self) -> usize {
        (self as u8 ^ 0x80) as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        (index as u8 ^ 0x80) as i8
    }
}

impl CountingKey for i16 {
    const DOMAIN: usize = 1 << 16;

    #[inline]
    fn index(self) -> usize {
        (self as u16 ^ 0x8000) as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        (index as u16 ^ 0x8000) as i16
    }
}

impl CountingKey for u16 {
    const DOMAIN: usize = 1 << 16;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index as u16
    }
}

/// Sorts `v` by computing a histogram of all values and writing them back in order.
///
/// *O*(*n* + DOMAIN), only worth it when `v` is not much smaller than the domain.
pub(crate) fn counting_sort<T: CountingKey>(v: &mut [T]) {
    let mut count = vec![0usize; T::DOMAIN];

    for &x in v.iter() {
        count[x.index()] += 1;
    }

    // Place values on their final positions, from the largest value down. Stop as soon as the
    // range is filled, small ranges never visit most of the domain.
    let mut high = v.len();
    for index in (0..T::DOMAIN).rev() {
        if high == 0 {
            break;
        }

        let c = count[index];
        if c != 0 {
            v[high - c..high].fill(T::from_index(index));
            high -= c;
        }
    }
}
