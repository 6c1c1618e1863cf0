//! Empirical thresholds steering the choice between the sort strategies.
//!
//! The defaults are the reference values. They encode cache and allocator trade-offs of the
//! hardware they were measured on, so every one of them can be changed per call or per process.

use std::env;
use std::str::FromStr;

use log::warn;
use once_cell::sync::OnceCell;

use crate::error::SortError;
use crate::DualPivotSort;

/// Thresholds used by every engine.
///
/// `Tunables::default()` yields the reference values, [`Tunables::global`] the process-wide values
/// which may be overridden via `DUAL_PIVOT_*` environment variables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tunables {
    /// Max size of a non-leftmost part sorted with mixed insertion sort. The limit grows with the
    /// recursion depth.
    pub max_mixed_insertion_sort_size: usize,
    /// Max size of a part sorted with plain insertion sort.
    pub max_insertion_sort_size: usize,
    /// Min size of a range sorted in parallel, also the min size of a part that is forked.
    pub min_parallel_sort_size: usize,
    /// Min size of a non-leftmost part for which merging of runs is tried.
    pub min_try_merge_size: usize,
    /// Min size of the first run to continue with scanning.
    pub min_first_run_size: usize,
    /// Shift applied to the scanned length, bounding the number of runs found so far.
    pub min_first_runs_factor: u32,
    /// Max number of runs, above it the range is not considered highly structured.
    pub max_run_capacity: usize,
    /// Min number of runs required to merge runs in parallel.
    pub min_run_count: usize,
    /// Min size of the larger part to split a merge in parallel.
    pub min_parallel_merge_parts_size: usize,
    /// Min size of an `i8` range to use counting sort.
    pub min_byte_counting_sort_size: usize,
    /// Min size of an `i16` or `u16` range to use counting sort.
    pub min_short_or_char_counting_sort_size: usize,
    /// Step the recursion depth is incremented by per partitioning.
    pub delta: usize,
    /// Max recursion depth before switching to heapsort, or counting sort for narrow types.
    pub max_recursion_depth: usize,
}

const DELTA: usize = 3 << 1;

impl Default for Tunables {
    fn default() -> Self {
        Self {
            max_mixed_insertion_sort_size: 65,
            max_insertion_sort_size: 44,
            min_parallel_sort_size: 4 << 10,
            min_try_merge_size: 4 << 10,
            min_first_run_size: 16,
            min_first_runs_factor: 7,
            max_run_capacity: 5 << 10,
            min_run_count: 4,
            min_parallel_merge_parts_size: 4 << 10,
            min_byte_counting_sort_size: 64,
            min_short_or_char_counting_sort_size: 1750,
            delta: DELTA,
            max_recursion_depth: 64 * DELTA,
        }
    }
}

macro_rules! tunable_setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        impl Tunables {
            $(
                #[must_use]
                pub fn $field(mut self, value: $ty) -> Self {
                    self.$field = value;
                    self
                }
            )*
        }
    };
}

// Builder style setters named after the fields, `Tunables::default().max_insertion_sort_size(4)`.
tunable_setters!(
    max_mixed_insertion_sort_size: usize,
    max_insertion_sort_size: usize,
    min_parallel_sort_size: usize,
    min_try_merge_size: usize,
    min_first_run_size: usize,
    min_first_runs_factor: u32,
    max_run_capacity: usize,
    min_run_count: usize,
    min_parallel_merge_parts_size: usize,
    min_byte_counting_sort_size: usize,
    min_short_or_char_counting_sort_size: usize,
    delta: usize,
    max_recursion_depth: usize,
);

impl Tunables {
    /// The tunables used by [`crate::sort`] and [`crate::try_sort`].
    ///
    /// Initialized once per process from [`Tunables::from_env`].
    pub fn global() -> &'static Tunables {
        static GLOBAL: OnceCell<Tunables> = OnceCell::new();

        GLOBAL.get_or_init(Tunables::from_env)
    }

    /// Starts from the defaults and applies every `DUAL_PIVOT_<FIELD>` environment variable, e.g.
    /// `DUAL_PIVOT_MIN_PARALLEL_SORT_SIZE=8192`. Values that don't parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn apply<V: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, dst: &mut V) {
            let key = format!("DUAL_PIVOT_{}", name.to_ascii_uppercase());

            if let Some(raw) = lookup(&key) {
                match V::from_str(raw.trim()) {
                    Ok(val) => *dst = val,
                    Err(_) => warn!("Ignoring {key}={raw:?}, not a valid value."),
                }
            }
        }

        let mut t = Self::default();

        apply(&lookup, "max_mixed_insertion_sort_size", &mut t.max_mixed_insertion_sort_size);
        apply(&lookup, "max_insertion_sort_size", &mut t.max_insertion_sort_size);
        apply(&lookup, "min_parallel_sort_size", &mut t.min_parallel_sort_size);
        apply(&lookup, "min_try_merge_size", &mut t.min_try_merge_size);
        apply(&lookup, "min_first_run_size", &mut t.min_first_run_size);
        apply(&lookup, "min_first_runs_factor", &mut t.min_first_runs_factor);
        apply(&lookup, "max_run_capacity", &mut t.max_run_capacity);
        apply(&lookup, "min_run_count", &mut t.min_run_count);
        apply(&lookup, "min_parallel_merge_parts_size", &mut t.min_parallel_merge_parts_size);
        apply(&lookup, "min_byte_counting_sort_size", &mut t.min_byte_counting_sort_size);
        apply(
            &lookup,
            "min_short_or_char_counting_sort_size",
            &mut t.min_short_or_char_counting_sort_size,
        );
        apply(&lookup, "delta", &mut t.delta);
        apply(&lookup, "max_recursion_depth", &mut t.max_recursion_depth);

        let clamped = t.clamped();
        if clamped != t {
            warn!("Clamped tunables from the environment to usable values: {clamped:?}.");
        }

        clamped
    }

    /// Moves the fields the engines can't work with to the nearest usable value.
    ///
    /// The run count bound shifts a `usize`, so its factor stays below `usize::BITS`. The depth
    /// must grow on every partitioning step or the heapsort fallback is never reached.
    pub(crate) fn clamped(mut self) -> Self {
        self.min_first_runs_factor = self.min_first_runs_factor.min(usize::BITS - 1);
        self.delta = self.delta.max(1);
        self
    }

    /// Sorts `v[low..high]` in non-descending order using these tunables.
    ///
    /// `min_first_runs_factor` is capped below `usize::BITS` and `delta` raised to at least 1.
    /// `parallelism` is the number of workers the sort may keep busy, 1 disables the parallel
    /// layer. See [`crate::try_sort`] for the errors.
    pub fn sort<T: DualPivotSort>(
        &self,
        v: &mut [T],
        parallelism: usize,
        low: usize,
        high: usize,
    ) -> Result<(), SortError> {
        SortError::check(v.len(), parallelism, low, high)?;

        T::sort_slice(&mut v[low..high], parallelism, &self.clamped())
    }
}
