//! Entry of the wide engine, splitting large ranges into independently sorted and merged halves.

use log::debug;

use crate::error::SortError;
use crate::merge::merge_parts;
use crate::quicksort::{self, Recursion, Region};
use crate::tunables::Tunables;
use crate::Element;

/// Sorts `v` with the wide engine, on the rayon pool if `parallelism > 1` and `v` is large
/// enough.
pub(crate) fn sort<T: Element>(
    v: &mut [T],
    parallelism: usize,
    t: &Tunables,
) -> Result<(), SortError> {
    let size = v.len();

    if parallelism > 1 && size > t.min_parallel_sort_size {
        let depth = depth(parallelism, size >> 12);
        debug!("Sorting {size} elements in parallel, parallelism {parallelism}, depth {depth}.");

        if depth == 0 {
            sort_task(v, None, 0, t);
        } else {
            let mut buf = Vec::new();
            buf.try_reserve_exact(size)
                .map_err(|_| SortError::ScratchAllocation { requested: size })?;
            buf.resize(size, v[0]);

            sort_task(v, Some(&mut buf), depth, t);
        }
    } else {
        debug!("Sorting {size} elements sequentially.");
        quicksort::sort(None, Region::new(v, None), Recursion::leftmost(), t);
    }

    Ok(())
}

/// Number of halvings applied before the halves are sorted, as a non-positive even number.
///
/// Every step consumes 2, the depth toggles the roles of array and buffer on the way down, so
/// the leaves always sort the original array.
pub(crate) fn depth(mut parallelism: usize, mut size: usize) -> i32 {
    let mut depth = 0;

    loop {
        parallelism >>= 3;
        if parallelism == 0 {
            break;
        }

        size >>= 2;
        if size == 0 {
            break;
        }

        depth -= 2;
    }

    depth
}

/// Sorts `a`, using the aligned `b` as scratch.
///
/// A negative `depth` splits `a` into halves, sorts them into `b` with the roles swapped and
/// merges them back into `a`. At depth 0 the partitioning engine runs on `a`, forking onto a
/// rayon scope.
fn sort_task<T: Element>(a: &mut [T], b: Option<&mut [T]>, depth: i32, t: &Tunables) {
    match b {
        Some(b) if depth < 0 => {
            let half = a.len() >> 1;

            {
                let (a1, a2) = a.split_at_mut(half);
                let (b1, b2) = b.split_at_mut(half);

                rayon::join(
                    || sort_task(b1, Some(a1), depth + 1, t),
                    || sort_task(b2, Some(a2), depth + 1, t),
                );
            }

            let (left, right) = b.split_at(half);
            merge_parts(a, left, right, true, t);
        }
        b => {
            let region = Region::new(a, b);
            rayon::scope(move |s| quicksort::sort(Some(s), region, Recursion::leftmost(), t));
        }
    }
}
