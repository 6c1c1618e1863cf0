use crate::Element;

/// Sorts `v[low..high]` using insertion sort.
///
/// Doesn't rely on anything to the left of `low`, so it is safe to use for the leftmost part.
pub(crate) fn insertion_sort<T: Element>(v: &mut [T], low: usize, high: usize) {
    for k in (low + 1)..high {
        let ak = v[k];

        if ak < v[k - 1] {
            let mut i = k;

            while i > low && ak < v[i - 1] {
                v[i] = v[i - 1];
                i -= 1;
            }
            v[i] = ak;
        }
    }
}

/// Sorts `v[low..high]` using mixed insertion sort, a combination of simple insertion sort, pin
/// insertion sort and pair insertion sort.
///
/// Simple insertion sort is used for `v[low..end]` when `end == high`. Otherwise pin insertion
/// sort handles `v[low..end]` and pair insertion sort the remaining `v[end..high]`, which must
/// have an even length.
///
/// `v[low - 1]` must exist and must not be greater than any element of `v[low..high]`. In the
/// context of the partitioning loop this is the pivot of the part to the left. It acts as
/// sentinel, so none of the inner loops have to check the left bound.
pub(crate) fn mixed_insertion_sort<T: Element>(v: &mut [T], low: usize, end: usize, high: usize) {
    debug_assert!(low >= 1 && low <= end && end <= high && high <= v.len());
    debug_assert!((high - end) % 2 == 0);

    let mut low = low;

    if end == high {
        // Simple insertion sort on tiny part.
        loop {
            low += 1;
            if low >= end {
                break;
            }

            let ai = v[low];
            let mut i = low;

            while ai < v[i - 1] {
                v[i] = v[i - 1];
                i -= 1;
            }
            v[i] = ai;
        }

        return;
    }

    // Pin insertion sort is extended simple insertion sort. Elements larger than the pin are put
    // to the end of the part, the proper area for such elements. This avoids expensive movements
    // of these elements through the whole part.
    let pin = v[end];
    let mut p = high;

    loop {
        low += 1;
        if low >= end {
            break;
        }

        let mut ai = v[low];
        let mut i = low;

        if ai < v[i - 1] {
            // Small element, insert it into the sorted part.
            v[i] = v[i - 1];
            i -= 1;

            while ai < v[i - 1] {
                v[i] = v[i - 1];
                i -= 1;
            }
            v[i] = ai;
        } else if p > i && ai > pin {
            // Large element, find an element not larger than the pin. The sentinel stops the scan.
            p -= 1;
            while v[p] > pin {
                p -= 1;
            }

            // Swap it with the large element.
            if p > i {
                ai = v[p];
                v[p] = v[i];
            }

            while ai < v[i - 1] {
                v[i] = v[i - 1];
                i -= 1;
            }
            v[i] = ai;
        }
    }

    // Pair insertion sort on the remaining part. Insert two elements per iteration, first the
    // larger one and then the smaller one, starting from where the larger one ended up.
    while low < high {
        let mut i = low;
        let a1 = v[low];
        low += 1;
        let a2 = v[low];

        if a1 > a2 {
            i -= 1;
            while a1 < v[i] {
                v[i + 2] = v[i];
                i -= 1;
            }
            i += 1;
            v[i + 1] = a1;

            i -= 1;
            while a2 < v[i] {
                v[i + 1] = v[i];
                i -= 1;
            }
            v[i + 1] = a2;
        } else if a1 < v[i - 1] {
            i -= 1;
            while a2 < v[i] {
                v[i + 2] = v[i];
                i -= 1;
            }
            i += 1;
            v[i + 1] = a2;

            i -= 1;
            while a1 < v[i] {
                v[i + 1] = v[i];
                i -= 1;
            }
            v[i + 1] = a1;
        }

        low += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted<T: PartialOrd>(v: &[T]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    // Deterministic pseudo random values, good enough to shuffle small inputs.
    fn lcg_vec(len: usize, seed: u64, modulo: i64) -> Vec<i64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) as i64) % modulo
            })
            .collect()
    }

    #[test]
    fn insertion_sort_sub_range() {
        let mut v = [9, 5, 4, 3, 2, 1, 0];
        insertion_sort(&mut v, 1, 5);
        assert_eq!(v, [9, 2, 3, 4, 5, 1, 0]);

        let mut empty: [i32; 0] = [];
        insertion_sort(&mut empty, 0, 0);

        let mut pair = [2, 1];
        insertion_sort(&mut pair, 0, 2);
        assert_eq!(pair, [1, 2]);
    }

    #[test]
    fn mixed_insertion_sort_tiny() {
        // Sentinel at index 0.
        let mut v = [i32::MIN, 7, 3, 9, 1, 1, 8];
        let high = v.len();
        mixed_insertion_sort(&mut v, 1, high, high);
        assert_eq!(v, [i32::MIN, 1, 1, 3, 7, 8, 9]);
    }

    #[test]
    fn mixed_insertion_sort_pin_and_pair() {
        for len in [32, 33, 48, 63, 64, 100, 200, 449] {
            for seed in 0..8 {
                let modulo = if seed % 2 == 0 { 1_000 } else { 5 };
                let mut v = vec![-1];
                v.extend(lcg_vec(len, seed, modulo));

                let mut expected = v.clone();
                expected.sort_unstable();

                let (low, high) = (1, v.len());
                let size = high - low;
                let end = high - 3 * ((size >> 5) << 3);
                mixed_insertion_sort(&mut v, low, end, high);

                assert!(is_sorted(&v), "len {len} seed {seed}");
                assert_eq!(v, expected);
            }
        }
    }

    #[test]
    fn mixed_insertion_sort_descending() {
        let mut v: Vec<i64> = std::iter::once(0).chain((1..=96).rev()).collect();
        let high = v.len();
        let end = high - 3 * ((96 >> 5) << 3);
        mixed_insertion_sort(&mut v, 1, end, high);

        assert_eq!(v, (0..=96).collect::<Vec<_>>());
    }
}
