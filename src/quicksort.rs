//! The sequential partitioning engine, able to fork sub-ranges onto a rayon scope.

use log::trace;
use rayon::Scope;

use crate::heapsort::heapsort;
use crate::insertion::{insertion_sort, mixed_insertion_sort};
use crate::partition::{partition, Split, MIN_PARTITION_SIZE};
use crate::runs::try_merge_runs;
use crate::tunables::Tunables;
use crate::Element;

/// Recursion state of a range.
///
/// `depth` grows by `delta` per partitioning step along any path. A range is leftmost if nothing
/// of the sorted area lies to its left, only leftmost ranges lack a sentinel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Recursion {
    depth: usize,
    leftmost: bool,
}

impl Recursion {
    pub(crate) const fn leftmost() -> Self {
        Self {
            depth: 0,
            leftmost: true,
        }
    }

    fn non_leftmost(self) -> Self {
        Self {
            leftmost: false,
            ..self
        }
    }

    /// Depth plus one for non-leftmost ranges, the value all size thresholds are compared with.
    fn bits(self) -> usize {
        self.depth.saturating_add(usize::from(!self.leftmost))
    }

    fn is_root(self) -> bool {
        self.depth == 0 && self.leftmost
    }

    /// Steps one level deeper, returns `false` once the depth ceiling is exceeded.
    fn descend(&mut self, t: &Tunables) -> bool {
        self.depth = self.depth.saturating_add(t.delta.max(1));
        self.bits() <= t.max_recursion_depth
    }
}

/// A range to sort together with its part of the scratch buffer.
///
/// For non-leftmost ranges `v[0]` is the sentinel, the last pivot to the left, and the range to
/// sort is `v[1..]`. `buf` is aligned with `v` and has the same length.
pub(crate) struct Region<'a, T> {
    v: &'a mut [T],
    buf: Option<&'a mut [T]>,
}

impl<'a, T> Region<'a, T> {
    pub(crate) fn new(v: &'a mut [T], buf: Option<&'a mut [T]>) -> Self {
        debug_assert!(buf.as_ref().map_or(true, |b| b.len() == v.len()));

        Self { v, buf }
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        let (v_left, v_right) = self.v.split_at_mut(mid);

        let (buf_left, buf_right) = match self.buf {
            Some(b) => {
                let (l, r) = b.split_at_mut(mid);
                (Some(l), Some(r))
            }
            None => (None, None),
        };

        (Self::new(v_left, buf_left), Self::new(v_right, buf_right))
    }
}

/// Sorts the range described by `region` and `rec`.
///
/// With a `scope`, sufficiently large sub-ranges are spawned onto it and run merges may use the
/// rayon pool. The caller is responsible for waiting on the scope.
pub(crate) fn sort<'s, T: Element>(
    scope: Option<&Scope<'s>>,
    mut region: Region<'s, T>,
    mut rec: Recursion,
    t: &Tunables,
) {
    loop {
        let low = usize::from(!rec.leftmost);
        let high = region.v.len();
        let size = high - low;

        // Run mixed insertion sort on small non-leftmost parts.
        if !rec.leftmost && size < t.max_mixed_insertion_sort_size.saturating_add(rec.bits()) {
            mixed_insertion_sort(region.v, low, high - 3 * ((size >> 5) << 3), high);
            return;
        }

        // Invoke insertion sort on small leftmost part.
        if size < t.max_insertion_sort_size.max(MIN_PARTITION_SIZE) {
            insertion_sort(region.v, low, high);
            return;
        }

        // Check if the whole array or large non-leftmost parts are nearly sorted and then merge
        // runs.
        if rec.is_root() || (!rec.leftmost && size > t.min_try_merge_size) {
            let buf = region.buf.as_deref_mut().map(|b| &mut b[low..]);

            if try_merge_runs(&mut region.v[low..], buf, scope.is_some(), t) {
                return;
            }
        }

        // Switch to heapsort if execution time is becoming quadratic.
        if !rec.descend(t) {
            trace!("Recursion depth exceeded for {size} elements, falling back to heapsort.");
            heapsort(&mut region.v[low..]);
            return;
        }

        let fork = scope.filter(|_| size > t.min_parallel_sort_size);

        // Sort non-left parts recursively (possibly in parallel), excluding known pivots. Each of
        // them keeps the pivot to its left as sentinel.
        match partition(region.v, low, high) {
            Split::Dual { lower, upper } => {
                let (rest, right) = region.split_at(upper);
                let (left, middle) = rest.split_at(lower);

                fork_or_sort(fork, scope, middle, rec.non_leftmost(), t);
                fork_or_sort(fork, scope, right, rec.non_leftmost(), t);

                region = left;
            }
            Split::Single { lower, upper } => {
                let (rest, right) = region.split_at(upper - 1);
                let (left, _) = rest.split_at(lower);

                fork_or_sort(fork, scope, right, rec.non_leftmost(), t);

                region = left;
            }
        }

        // Iterate along the left part.
    }
}

#[inline]
fn fork_or_sort<'s, T: Element>(
    fork: Option<&Scope<'s>>,
    scope: Option<&Scope<'s>>,
    region: Region<'s, T>,
    rec: Recursion,
    t: &Tunables,
) {
    match fork {
        Some(s) => {
            let t = *t;
            s.spawn(move |s| sort(Some(s), region, rec, &t));
        }
        None => sort(scope, region, rec, t),
    }
}

/// Partitioning loop for the 16-bit types, falling back to `fallback` instead of heapsort.
///
/// Sorts `v[low..high]` where `v[low - 1]` is the sentinel unless `rec` is leftmost. Never forks,
/// never merges runs.
pub(crate) fn sort_narrow<T: Element>(
    v: &mut [T],
    mut rec: Recursion,
    low: usize,
    mut high: usize,
    t: &Tunables,
    fallback: fn(&mut [T]),
) {
    loop {
        let size = high - low;

        // Invoke insertion sort on small part.
        if size < t.max_insertion_sort_size.max(MIN_PARTITION_SIZE) {
            insertion_sort(v, low, high);
            return;
        }

        // Switch to counting sort if execution time is becoming quadratic.
        if !rec.descend(t) {
            trace!("Recursion depth exceeded for {size} elements, falling back to counting sort.");
            fallback(&mut v[low..high]);
            return;
        }

        match partition(v, low, high) {
            Split::Dual { lower, upper } => {
                sort_narrow(v, rec.non_leftmost(), lower + 1, upper, t, fallback);
                sort_narrow(v, rec.non_leftmost(), upper + 1, high, t, fallback);
                high = lower;
            }
            Split::Single { lower, upper } => {
                sort_narrow(v, rec.non_leftmost(), upper, high, t, fallback);
                high = lower;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::counting::counting_sort;

    fn lcg_vec(len: usize, seed: u64, modulo: i64) -> Vec<i64> {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) as i64) % modulo
            })
            .collect()
    }

    fn sort_sequential(v: &mut [i64], t: &Tunables) {
        sort(None, Region::new(v, None), Recursion::leftmost(), t);
    }

    fn check(mut v: Vec<i64>, t: &Tunables) {
        let mut expected = v.clone();
        expected.sort_unstable();

        sort_sequential(&mut v, t);
        assert_eq!(v, expected);
    }

    #[test]
    fn recursion_bits() {
        let t = Tunables::default();
        let mut rec = Recursion::leftmost();
        assert_eq!(rec.bits(), 0);
        assert!(rec.is_root());

        assert!(rec.descend(&t));
        assert_eq!(rec.bits(), 6);
        assert!(!rec.is_root());

        let child = rec.non_leftmost();
        assert_eq!(child.bits(), 7);

        let mut deep = Recursion {
            depth: 378,
            leftmost: false,
        };
        assert!(!deep.descend(&t));
    }

    #[test]
    fn sorts_random() {
        let t = Tunables::default();

        for len in [0, 1, 2, 10, 43, 44, 45, 65, 100, 500, 4097, 20_000] {
            check(lcg_vec(len, len as u64, i64::MAX), &t);
            check(lcg_vec(len, len as u64 + 1, 16), &t);
        }
    }

    #[test]
    fn sorts_structured() {
        let t = Tunables::default();
        let len = 10_000;

        check((0..len).collect(), &t);
        check((0..len).rev().collect(), &t);
        check(vec![42; len as usize], &t);
        check((0..len / 2).chain((0..len / 2).rev()).collect(), &t);
        check((0..len).map(|i| i % 97).collect(), &t);
    }

    #[test]
    fn heapsort_fallback() {
        // A ceiling of zero takes the fallback right after the first size checks.
        let t = Tunables::default().max_recursion_depth(0);
        check(lcg_vec(5000, 7, 1000), &t);

        let t = Tunables::default().max_recursion_depth(12);
        check(lcg_vec(5000, 8, 1_000_000), &t);
    }

    #[test]
    fn huge_mixed_insertion_threshold() {
        let t = Tunables::default().max_mixed_insertion_sort_size(usize::MAX);

        for len in [100, 3000] {
            check(lcg_vec(len, 21, 1_000_000), &t);
            check(lcg_vec(len, 22, 7), &t);
        }
    }

    #[test]
    fn zero_delta_still_reaches_heapsort() {
        let mut rec = Recursion::leftmost();
        let t = Tunables::default().delta(0).max_recursion_depth(2);

        assert!(rec.descend(&t));
        assert!(rec.descend(&t));
        assert!(!rec.descend(&t));

        check(lcg_vec(20_000, 23, 1_000_000), &t);
    }

    #[test]
    fn saturating_depth() {
        let t = Tunables::default().delta(usize::MAX);

        let mut rec = Recursion::leftmost().non_leftmost();
        assert!(!rec.descend(&t));
        assert_eq!(rec.bits(), usize::MAX);

        check(lcg_vec(5000, 24, 1000), &t);
    }

    #[test]
    fn tiny_thresholds_are_clamped() {
        let t = Tunables::default()
            .max_insertion_sort_size(0)
            .max_mixed_insertion_sort_size(0)
            .min_try_merge_size(0);

        for len in [2, 3, 40, 41, 42, 200, 3000] {
            check(lcg_vec(len, 3, 50), &t);
        }
    }

    #[test]
    fn parallel_scope_matches_sequential() {
        let t = Tunables::default()
            .min_parallel_sort_size(64)
            .min_parallel_merge_parts_size(64);

        for seed in 0..4 {
            let original = lcg_vec(50_000, seed, 10_000);
            let mut expected = original.clone();
            sort_sequential(&mut expected, &t);

            let mut v = original.clone();
            let mut buf = original;
            let region = Region::new(&mut v[..], Some(&mut buf[..]));
            rayon::scope(move |s| sort(Some(s), region, Recursion::leftmost(), &t));

            assert_eq!(v, expected);
        }
    }

    #[test]
    fn narrow_loop() {
        let t = Tunables::default();

        for len in [0, 1, 30, 44, 45, 500, 1749, 10_000] {
            let mut v: Vec<i16> = lcg_vec(len, 11, 65536)
                .into_iter()
                .map(|x| (x - 32768) as i16)
                .collect();
            let mut expected = v.clone();
            expected.sort_unstable();

            let high = v.len();
            sort_narrow(&mut v, Recursion::leftmost(), 0, high, &t, counting_sort);
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn narrow_loop_counting_fallback() {
        let t = Tunables::default().max_recursion_depth(6);

        let mut v: Vec<u16> = lcg_vec(3000, 5, 700).into_iter().map(|x| x as u16).collect();
        let mut expected = v.clone();
        expected.sort_unstable();

        sort_narrow(&mut v, Recursion::leftmost(), 0, 3000, &t, counting_sort);
        assert_eq!(v, expected);
    }
}
