use crate::Element;

/// Smallest range for which the five samples land on distinct positions. The partitioning loops
/// treat smaller ranges with insertion sort, whatever the tunables say.
pub(crate) const MIN_PARTITION_SIZE: usize = 41;

/// Outcome of partitioning `v[low..high]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Split {
    /// Two pivots were used, `v[lower]` holds pivot1 and `v[upper]` pivot2, both are in their
    /// final position.
    ///
    /// `v[low..lower] < pivot1 <= v[lower + 1..upper] <= pivot2 < v[upper + 1..high]`
    Dual { lower: usize, upper: usize },

    /// A single pivot was used because the samples contained equal elements.
    ///
    /// `v[low..lower] < pivot == v[lower..upper] < v[upper..high]`
    Single { lower: usize, upper: usize },
}

/// Picks pivots from five samples of `v[low..high]` and partitions the range around them.
///
/// The range must contain at least [`MIN_PARTITION_SIZE`] elements.
pub(crate) fn partition<T: Element>(v: &mut [T], low: usize, high: usize) -> Split {
    debug_assert!(high - low >= MIN_PARTITION_SIZE && high <= v.len());

    let [e1, e2, e3, e4, e5] = sort_samples(v, low, high);

    if v[e1] < v[e2] && v[e2] < v[e3] && v[e3] < v[e4] && v[e4] < v[e5] {
        // Use the first and fifth of the five sorted samples as pivots. These values are an
        // inexpensive approximation of tertiles, pivot1 < pivot2.
        partition_dual(v, low, high, e1, e5)
    } else {
        // Use the third sample, an inexpensive approximation of the median.
        partition_single(v, low, high, e3)
    }
}

/// Selects five sample positions around (and including) the central element and sorts the
/// elements at those positions in place. Returns the positions in ascending order.
///
/// Uses an inexpensive approximation of the golden ratio for the spacing. The unequal spacing was
/// empirically determined to work well on a wide variety of inputs.
fn sort_samples<T: Element>(v: &mut [T], low: usize, high: usize) -> [usize; 5] {
    let end = high - 1;
    let size = high - low;
    let step = (size >> 3) * 3 + 3;

    let e1 = low + step;
    let e5 = end - step;
    let e3 = (e1 + e5) >> 1;
    let e2 = (e1 + e3) >> 1;
    let e4 = (e3 + e5) >> 1;
    let a3 = v[e3];

    // Sort these elements in place by the combination of 4-element sorting network and insertion
    // sort.
    //
    //    5 ------o-----------o------------
    //            |           |
    //    4 ------|-----o-----o-----o------
    //            |     |           |
    //    2 ------o-----|-----o-----o------
    //                  |     |
    //    1 ------------o-----o------------
    swap_if_less(v, e5, e2);
    swap_if_less(v, e4, e1);
    swap_if_less(v, e5, e4);
    swap_if_less(v, e2, e1);
    swap_if_less(v, e4, e2);

    if a3 < v[e2] {
        if a3 < v[e1] {
            v[e3] = v[e2];
            v[e2] = v[e1];
            v[e1] = a3;
        } else {
            v[e3] = v[e2];
            v[e2] = a3;
        }
    } else if a3 > v[e4] {
        if a3 > v[e5] {
            v[e3] = v[e4];
            v[e4] = v[e5];
            v[e5] = a3;
        } else {
            v[e3] = v[e4];
            v[e4] = a3;
        }
    }

    [e1, e2, e3, e4, e5]
}

#[inline(always)]
fn swap_if_less<T: Element>(v: &mut [T], a: usize, b: usize) {
    if v[a] < v[b] {
        v.swap(a, b);
    }
}

/// Backward 3-interval partitioning with the pivots taken from `v[e1]` and `v[e5]`.
fn partition_dual<T: Element>(v: &mut [T], low: usize, high: usize, e1: usize, e5: usize) -> Split {
    let end = high - 1;
    let pivot1 = v[e1];
    let pivot2 = v[e5];

    // The index of the last element of the left part.
    let mut lower = low;
    // The index of the first element of the right part.
    let mut upper = end;

    // The first and the last elements to be sorted are moved to the locations formerly occupied by
    // the pivots. When partitioning is completed, the pivots are swapped back into their final
    // positions, and excluded from subsequent sorting.
    v[e1] = v[lower];
    v[e5] = v[upper];

    // Skip elements, which are less or greater than the pivots. The samples between the pivots stop
    // both scans.
    lower += 1;
    while v[lower] < pivot1 {
        lower += 1;
    }
    upper -= 1;
    while v[upper] > pivot2 {
        upper -= 1;
    }

    //   left part                 central part          right part
    // +------------------------------------------------------------+
    // |  < pivot1  |   ?   |  pivot1 <= && <= pivot2  |  > pivot2  |
    // +------------------------------------------------------------+
    //             ^       ^                            ^
    //             |       |                            |
    //           lower     k                          upper
    //
    // Invariants:
    //
    //              all in (low, lower] < pivot1
    //    pivot1 <= all in (k, upper)  <= pivot2
    //              all in [upper, end) > pivot2
    //
    // Pointer k is the last index of the ?-part.
    lower -= 1;
    upper += 1;
    let mut k = upper;

    loop {
        k -= 1;
        if k <= lower {
            break;
        }

        let ak = v[k];

        if ak < pivot1 {
            // Move v[k] to the left side.
            while lower < k {
                lower += 1;

                if v[lower] >= pivot1 {
                    if v[lower] > pivot2 {
                        upper -= 1;
                        v[k] = v[upper];
                        v[upper] = v[lower];
                    } else {
                        v[k] = v[lower];
                    }
                    v[lower] = ak;
                    break;
                }
            }
        } else if ak > pivot2 {
            // Move v[k] to the right side.
            upper -= 1;
            v[k] = v[upper];
            v[upper] = ak;
        }
    }

    // Swap the pivots into their final positions.
    v[low] = v[lower];
    v[lower] = pivot1;
    v[end] = v[upper];
    v[upper] = pivot2;

    Split::Dual { lower, upper }
}

/// Traditional 3-way (Dutch National Flag) partitioning around `v[e3]`.
fn partition_single<T: Element>(v: &mut [T], low: usize, high: usize, e3: usize) -> Split {
    let pivot = v[e3];

    let mut lower = low;
    let mut upper = high - 1;

    // The first element to be sorted is moved to the location formerly occupied by the pivot.
    v[e3] = v[lower];

    //   left part                 central part    right part
    // +------------------------------------------------------+
    // |   < pivot   |     ?     |   == pivot   |   > pivot   |
    // +------------------------------------------------------+
    //              ^           ^                ^
    //              |           |                |
    //            lower         k              upper
    //
    // Invariants:
    //
    //   all in (low, lower] < pivot
    //   all in (k, upper)  == pivot
    //   all in [upper, end] > pivot
    //
    // Pointer k is the last index of the ?-part.
    upper += 1;
    let mut k = upper;

    loop {
        k -= 1;
        if k <= lower {
            break;
        }

        let ak = v[k];

        if ak != pivot {
            v[k] = pivot;

            if ak < pivot {
                // Move v[k] to the left side.
                lower += 1;
                while v[lower] < pivot {
                    lower += 1;
                }

                if v[lower] > pivot {
                    upper -= 1;
                    v[upper] = v[lower];
                }
                v[lower] = ak;
            } else {
                // Move v[k] to the right side.
                upper -= 1;
                v[upper] = ak;
            }
        }
    }

    // Swap the pivot into its final position.
    v[low] = v[lower];
    v[lower] = pivot;

    Split::Single { lower, upper }
}
