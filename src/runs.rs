//! Detection and merging of presorted runs.

use log::{trace, warn};

use crate::merge::{merge_into_tail, merge_parts};
use crate::tunables::Tunables;
use crate::Element;

/// Where the result of merging a group of runs ended up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Store {
    Array,
    Buffer,
}

/// Required destination when merging a group of runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Aim {
    Array,
    Buffer,
    Any,
}

impl Aim {
    fn flip(self) -> Self {
        match self {
            Aim::Array => Aim::Buffer,
            Aim::Buffer => Aim::Array,
            Aim::Any => Aim::Any,
        }
    }
}

/// Tries to sort `v` by finding and merging its runs.
///
/// Returns `true` if `v` ended up sorted, `false` if `v` is not highly structured and should be
/// partitioned instead. Descending runs found along the way are reversed, so on `false` `v` is
/// still a permutation of its input but possibly not the same order.
///
/// `buf` must be as long as `v` if given, otherwise a buffer is allocated once merging is
/// actually required. `parallel` allows merging on the rayon pool.
pub(crate) fn try_merge_runs<T: Element>(
    v: &mut [T],
    buf: Option<&mut [T]>,
    parallel: bool,
    t: &Tunables,
) -> bool {
    let size = v.len();

    // The run table is only constructed if the initial runs are long enough to continue,
    // `run[i]` then holds the start index of the i-th sequence in non-descending order.
    let run = match find_runs(v, t) {
        RunScan::Sorted => return true,
        RunScan::Unstructured => return false,
        RunScan::Runs(run) => run,
    };

    trace!("Merging {} runs of {size} elements.", run.len() - 1);

    match buf {
        Some(b) => {
            debug_assert_eq!(b.len(), size);
            merge_runs(v, b, Aim::Array, parallel, &run, t);
        }
        None => {
            let mut owned = Vec::new();
            if owned.try_reserve_exact(size).is_err() {
                warn!("Unable to allocate a merge buffer of {size} elements, partitioning instead.");
                return false;
            }
            // Scratch only, the merges overwrite every slot they read.
            owned.resize(size, v[0]);

            merge_runs(v, &mut owned, Aim::Array, parallel, &run, t);
        }
    }

    true
}

#[derive(Debug, PartialEq, Eq)]
enum RunScan {
    /// A single monotonic sequence, now in ascending order.
    Sorted,
    /// Too few or too short runs, merging would not pay off.
    Unstructured,
    /// Run boundaries, strictly increasing, first entry 0, last entry `v.len()`.
    Runs(Vec<usize>),
}

fn find_runs<T: Element>(v: &mut [T], t: &Tunables) -> RunScan {
    let high = v.len();
    let mut run: Option<Vec<usize>> = None;
    let mut count = 1;
    let mut last = 0;
    let mut k = 1;

    // Identify all possible runs.
    while k < high {
        // Find the end index of the current run.
        if v[k - 1] < v[k] {
            // Ascending sequence.
            k += 1;
            while k < high && v[k - 1] <= v[k] {
                k += 1;
            }
        } else if v[k - 1] > v[k] {
            // Descending sequence.
            k += 1;
            while k < high && v[k - 1] >= v[k] {
                k += 1;
            }

            // Reverse into ascending order. Stopping at the first pair that is not strictly
            // descending is fine, everything between is equal.
            let (mut i, mut j) = (last, k);
            loop {
                j -= 1;
                if !(i < j && v[i] > v[j]) {
                    break;
                }
                v.swap(i, j);
                i += 1;
            }
        } else {
            // Constant sequence, it becomes part of the following run.
            let ak = v[k];
            k += 1;
            while k < high && ak == v[k] {
                k += 1;
            }

            if k < high {
                continue;
            }
        }

        // Check special cases.
        let table = match run.as_mut() {
            None => {
                if k == high {
                    // The range is a monotonic sequence, and therefore already sorted.
                    return RunScan::Sorted;
                }

                if k < t.min_first_run_size {
                    // The first run is too small to proceed with scanning.
                    return RunScan::Unstructured;
                }

                let mut table = Vec::new();
                if table.try_reserve(((high >> 10) | 0x7F) & 0x3FF).is_err() {
                    warn!("Unable to allocate the run table, partitioning instead.");
                    return RunScan::Unstructured;
                }
                table.push(0);
                run.insert(table)
            }
            Some(table) => {
                if v[last - 1] > v[last] {
                    if count > k.checked_shr(t.min_first_runs_factor).unwrap_or(0) {
                        // The first runs are not long enough to continue scanning.
                        return RunScan::Unstructured;
                    }

                    count += 1;
                    if count == t.max_run_capacity {
                        // The range is not highly structured.
                        return RunScan::Unstructured;
                    }

                    if table.try_reserve(1).is_err() {
                        warn!("Unable to grow the run table, partitioning instead.");
                        return RunScan::Unstructured;
                    }
                }
                table
            }
        };

        // Either start the next run or extend the current one, if it continues in order.
        if table.len() == count {
            table.push(k);
        } else {
            table[count] = k;
        }
        last = k;
    }

    match run {
        Some(table) if count > 1 => RunScan::Runs(table),
        // All runs continued each other after reversing, the whole range is one ascending run.
        _ => RunScan::Sorted,
    }
}

/// Merges the runs delimited by `run` into `a` or `b` as requested by `aim` and reports where the
/// result ended up.
///
/// `a` and `b` cover exactly `run[0]..run[run.len() - 1]`, relative to `run[0]`.
fn merge_runs<T: Element>(
    a: &mut [T],
    b: &mut [T],
    aim: Aim,
    parallel: bool,
    run: &[usize],
    t: &Tunables,
) -> Store {
    let base = run[0];
    let hi = run.len() - 1;

    if hi == 1 {
        if aim != Aim::Buffer {
            return Store::Array;
        }

        b.copy_from_slice(a);
        return Store::Buffer;
    }

    // Split into approximately equal parts by data position, not by run count.
    let rmi = (run[0] + run[hi]) >> 1;
    let mut mi = 1;
    while run[mi + 1] <= rmi {
        mi += 1;
    }

    let m = run[mi] - base;

    let (s1, s2) = {
        let (a1, a2) = a.split_at_mut(m);
        let (b1, b2) = b.split_at_mut(m);

        if parallel && hi > t.min_run_count {
            rayon::join(
                || merge_runs(a1, b1, aim.flip(), true, &run[..=mi], t),
                || merge_runs(a2, b2, Aim::Any, true, &run[mi..], t),
            )
        } else {
            (
                merge_runs(a1, b1, aim.flip(), false, &run[..=mi], t),
                merge_runs(a2, b2, Aim::Any, false, &run[mi..], t),
            )
        }
    };

    // The destination is the opposite of where the left half is.
    match (s1, s2) {
        (Store::Array, Store::Array) => {
            let (left, right) = a.split_at(m);
            merge_parts(b, left, right, parallel, t);
            Store::Buffer
        }
        (Store::Buffer, Store::Buffer) => {
            let (left, right) = b.split_at(m);
            merge_parts(a, left, right, parallel, t);
            Store::Array
        }
        (Store::Array, Store::Buffer) => {
            merge_into_tail(b, m, &a[..m]);
            Store::Buffer
        }
        (Store::Buffer, Store::Array) => {
            merge_into_tail(a, m, &b[..m]);
            Store::Array
        }
    }
}
