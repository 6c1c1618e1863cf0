//! Entries for the 8 and 16-bit types. These never run in parallel, counting sort covers large
//! ranges in linear time.

use log::debug;

use crate::counting::{counting_sort, CountingKey};
use crate::insertion::insertion_sort;
use crate::quicksort::{sort_narrow, Recursion};
use crate::tunables::Tunables;

pub(crate) fn sort_bytes<T: CountingKey>(v: &mut [T], t: &Tunables) {
    let size = v.len();

    if size > t.min_byte_counting_sort_size {
        debug!("Sorting {size} bytes with counting sort.");
        counting_sort(v);
    } else {
        debug!("Sorting {size} bytes with insertion sort.");
        insertion_sort(v, 0, size);
    }
}

pub(crate) fn sort_shorts<T: CountingKey>(v: &mut [T], t: &Tunables) {
    let size = v.len();

    if size > t.min_short_or_char_counting_sort_size {
        debug!("Sorting {size} 16-bit values with counting sort.");
        counting_sort(v);
    } else {
        debug!("Sorting {size} 16-bit values with dual-pivot quicksort.");
        sort_narrow(v, Recursion::leftmost(), 0, size, t, counting_sort::<T>);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shorts(len: usize, seed: u32) -> Vec<i16> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 16) as i16
            })
            .collect()
    }

    #[test]
    fn counting_and_partitioning_agree() {
        let counting = Tunables::default().min_short_or_char_counting_sort_size(0);
        let comparing = Tunables::default().min_short_or_char_counting_sort_size(usize::MAX);

        for len in [0, 1, 2, 45, 1000, 1751, 20_000] {
            let original = shorts(len, len as u32);

            let mut a = original.clone();
            sort_shorts(&mut a, &counting);

            let mut b = original.clone();
            sort_shorts(&mut b, &comparing);

            let mut expected = original;
            expected.sort_unstable();

            assert_eq!(a, expected);
            assert_eq!(b, expected);
        }
    }

    #[test]
    fn chars() {
        let mut v: Vec<u16> = "the quick brown fox jumps over the lazy dog, 0123456789 times"
            .encode_utf16()
            .chain([0xFFFF, 0xD800, 0].into_iter())
            .collect();
        let mut expected = v.clone();
        expected.sort_unstable();

        sort_shorts(&mut v, &Tunables::default());
        assert_eq!(v, expected);
    }

    #[test]
    fn bytes_both_paths() {
        for len in [0, 1, 2, 63, 64, 65, 300] {
            let original: Vec<i8> = (0..len).map(|i| ((i * 97 + 13) % 256) as u8 as i8).collect();
            let mut expected = original.clone();
            expected.sort_unstable();

            for threshold in [0, usize::MAX] {
                let t = Tunables::default().min_byte_counting_sort_size(threshold);
                let mut v = original.clone();
                sort_bytes(&mut v, &t);
                assert_eq!(v, expected, "len {len} threshold {threshold}");
            }
        }
    }
}
