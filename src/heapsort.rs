use crate::Element;

/// Sorts `v` using heapsort, which guarantees *O*(*n* \* log(*n*)) worst-case.
///
/// Only used once the partitioning recursion got too deep, it is slower than partitioning on
/// average.
pub(crate) fn heapsort<T: Element>(v: &mut [T]) {
    let len = v.len();

    // Build the heap in linear time.
    for k in (0..len / 2).rev() {
        push_down(v, k, v[k], len);
    }

    // Pop maximal elements from the heap.
    for high in (1..len).rev() {
        let max = v[0];
        push_down(v, 0, v[high], high);
        v[high] = max;
    }
}

/// Moves `value` down from `p` in the max-heap `v[..high]`, the slot at `p` is treated as a hole.
fn push_down<T: Element>(v: &mut [T], mut p: usize, value: T, high: usize) {
    loop {
        // Index of the right child.
        let mut k = (p << 1) + 2;

        if k > high {
            break;
        }

        // Choose the greater child.
        if k == high || v[k] < v[k - 1] {
            k -= 1;
        }

        // Stop if the invariant `parent >= child` holds for `value`.
        if v[k] <= value {
            break;
        }

        v[p] = v[k];
        p = k;
    }

    v[p] = value;
}
