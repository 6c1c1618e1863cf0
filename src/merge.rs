//! Merging of sorted parts, sequential or split into independent sub-merges.

use core::mem;

use rayon::Scope;

use crate::tunables::Tunables;
use crate::Element;

/// Merges the sorted `a1` and `a2` into `dst`, `dst.len()` must equal `a1.len() + a2.len()`.
///
/// With `parallel` set, merges whose larger part reaches `min_parallel_merge_parts_size` are
/// split into independent sub-merges which run on the rayon pool.
pub(crate) fn merge_parts<T: Element>(
    dst: &mut [T],
    a1: &[T],
    a2: &[T],
    parallel: bool,
    t: &Tunables,
) {
    debug_assert_eq!(dst.len(), a1.len() + a2.len());

    if parallel && a1.len().max(a2.len()) >= t.min_parallel_merge_parts_size {
        let t = *t;
        rayon::scope(move |s| split_merge(s, dst, a1, a2, t));
    } else {
        merge_sequential(dst, a1, a2);
    }
}

/// Splits the merge at the median of the larger part and the matching position in the smaller
/// part. The right sub-merge is forked, the left one continues on the current task.
fn split_merge<'s, T: Element>(
    s: &Scope<'s>,
    mut dst: &'s mut [T],
    mut a1: &'s [T],
    mut a2: &'s [T],
    t: Tunables,
) {
    loop {
        // The first part must be larger.
        if a1.len() < a2.len() {
            mem::swap(&mut a1, &mut a2);
        }

        // Small parts will be merged sequentially.
        if a1.len() < t.min_parallel_merge_parts_size {
            break;
        }

        // Find the median of the larger part and partition the smaller part by it.
        let mi1 = a1.len() >> 1;
        let key = a1[mi1];
        let mi2 = a2.partition_point(|x| *x < key);

        let (dst_left, dst_right) = mem::take(&mut dst).split_at_mut(mi1 + mi2);
        let (a1_left, a1_right) = a1.split_at(mi1);
        let (a2_left, a2_right) = a2.split_at(mi2);

        s.spawn(move |s| split_merge(s, dst_right, a1_right, a2_right, t));

        dst = dst_left;
        a1 = a1_left;
        a2 = a2_left;
    }

    merge_sequential(dst, a1, a2);
}

/// Standard two-pointer merge of `a1` and `a2` into `dst`.
pub(crate) fn merge_sequential<T: Element>(dst: &mut [T], a1: &[T], a2: &[T]) {
    let (mut i, mut j, mut k) = (0, 0, 0);

    while i < a1.len() && j < a2.len() {
        if a1[i] < a2[j] {
            dst[k] = a1[i];
            i += 1;
        } else {
            dst[k] = a2[j];
            j += 1;
        }
        k += 1;
    }

    let rest1 = &a1[i..];
    dst[k..k + rest1.len()].copy_from_slice(rest1);
    k += rest1.len();

    dst[k..].copy_from_slice(&a2[j..]);
}

/// Merges `left` with the sorted `dst[mid..]` into `dst`, where `mid == left.len()`.
///
/// The right part already sits at its final place, the write position never overtakes its read
/// position. Once `left` is exhausted the rest of the right part stays where it is.
pub(crate) fn merge_into_tail<T: Element>(dst: &mut [T], mid: usize, left: &[T]) {
    debug_assert_eq!(mid, left.len());

    let (mut i, mut j, mut k) = (0, mid, 0);

    while i < left.len() && j < dst.len() {
        if left[i] < dst[j] {
            dst[k] = left[i];
            i += 1;
        } else {
            dst[k] = dst[j];
            j += 1;
        }
        k += 1;
    }

    let rest = &left[i..];
    dst[k..k + rest.len()].copy_from_slice(rest);
}
