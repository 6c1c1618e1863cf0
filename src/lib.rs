//! In-place dual-pivot quicksort for primitive numbers.
//!
//! The engine adapts to its input: small ranges use insertion sort variants, highly structured
//! ranges are merged from their runs, everything else is partitioned around one or two pivots
//! with heapsort as worst-case guarantee. 8 and 16-bit integers use counting sort where it pays
//! off, floats are ordered as `-inf < .. < -0.0 < 0.0 < .. < inf < NaN`. Large ranges can be
//! split across the rayon pool.
//!
//! ```
//! let mut v = [5, -3, 8, 0, -3];
//! dual_pivot_sort::sort_all(&mut v);
//! assert_eq!(v, [-3, -3, 0, 5, 8]);
//!
//! let mut v = [f64::NAN, -0.0, 0.0, 1.0, -1.0];
//! dual_pivot_sort::sort(&mut v, 4, 0, 5);
//! assert_eq!(&v[..4], &[-1.0, -0.0, 0.0, 1.0]);
//! ```

mod counting;
mod error;
mod float;
mod heapsort;
mod insertion;
mod merge;
mod narrow;
mod parallel;
mod partition;
mod quicksort;
mod runs;
mod tunables;

pub use error::SortError;
pub use tunables::Tunables;

// --- Public ---

/// Element types the engine can sort.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `u16`, `f32` and `f64`, it can't be implemented
/// outside this crate.
pub trait DualPivotSort: private::Sealed + Copy + Send + Sync + 'static {
    #[doc(hidden)]
    fn sort_slice(v: &mut [Self], parallelism: usize, t: &Tunables) -> Result<(), SortError>;
}

/// Sorts `v[low..high]` in non-descending order with the process-wide [`Tunables::global`].
///
/// `parallelism` is the number of workers the sort may keep busy, 1 sorts on the calling thread.
///
/// # Panics
///
/// Panics with the message of the corresponding [`SortError`] if `low > high`, `high > v.len()`,
/// `parallelism == 0` or the scratch buffer can't be allocated.
pub fn sort<T: DualPivotSort>(v: &mut [T], parallelism: usize, low: usize, high: usize) {
    if let Err(err) = try_sort(v, parallelism, low, high) {
        panic!("{err}");
    }
}

/// Like [`sort`], but reports invalid arguments and allocation failure as error.
///
/// Nothing is moved if the arguments are rejected.
pub fn try_sort<T: DualPivotSort>(
    v: &mut [T],
    parallelism: usize,
    low: usize,
    high: usize,
) -> Result<(), SortError> {
    Tunables::global().sort(v, parallelism, low, high)
}

/// Sorts all of `v` on the calling thread.
pub fn sort_all<T: DualPivotSort>(v: &mut [T]) {
    let len = v.len();
    sort(v, 1, 0, len);
}

/// Sorts all of `v`, keeping every thread of the current rayon pool busy.
pub fn par_sort<T: DualPivotSort>(v: &mut [T]) {
    let len = v.len();
    sort(v, rayon::current_num_threads(), 0, len);
}

// --- IMPL ---

/// Everything the engines need from an element.
pub(crate) trait Element: Copy + PartialOrd + Send + Sync + 'static {}

impl<T: Copy + PartialOrd + Send + Sync + 'static> Element for T {}

mod private {
    pub trait Sealed {}
}

macro_rules! dual_pivot_sort_impl {
    (sequential $engine:path => $($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl DualPivotSort for $t {
                #[inline]
                fn sort_slice(v: &mut [Self], _: usize, t: &Tunables) -> Result<(), SortError> {
                    $engine(v, t);
                    Ok(())
                }
            }
        )*
    };
    ($engine:path => $($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl DualPivotSort for $t {
                #[inline]
                fn sort_slice(
                    v: &mut [Self],
                    parallelism: usize,
                    t: &Tunables,
                ) -> Result<(), SortError> {
                    $engine(v, parallelism, t)
                }
            }
        )*
    };
}

dual_pivot_sort_impl!(parallel::sort => i32, i64);
dual_pivot_sort_impl!(float::sort => f32, f64);
dual_pivot_sort_impl!(sequential narrow::sort_bytes => i8);
dual_pivot_sort_impl!(sequential narrow::sort_shorts => i16, u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_sorts() {
        let mut a = [3i8, -1, 2];
        sort_all(&mut a);
        assert_eq!(a, [-1, 2, 3]);

        let mut b = [3i16, -1, 2];
        sort_all(&mut b);
        assert_eq!(b, [-1, 2, 3]);

        let mut c = [3u16, 1, 2];
        sort_all(&mut c);
        assert_eq!(c, [1, 2, 3]);

        let mut d = [3i32, -1, 2];
        sort_all(&mut d);
        assert_eq!(d, [-1, 2, 3]);

        let mut e = [3i64, -1, 2];
        par_sort(&mut e);
        assert_eq!(e, [-1, 2, 3]);

        let mut f = [3.5f32, -1.0, 2.25];
        sort_all(&mut f);
        assert_eq!(f, [-1.0, 2.25, 3.5]);

        let mut g = [3.5f64, -1.0, 2.25];
        par_sort(&mut g);
        assert_eq!(g, [-1.0, 2.25, 3.5]);
    }

    #[test]
    fn sub_range_only() {
        let mut v = [9, 8, 7, 6, 5, 4, 3, 2, 1];
        sort(&mut v, 1, 2, 6);
        assert_eq!(v, [9, 8, 4, 5, 6, 7, 3, 2, 1]);
    }

    #[test]
    #[should_panic(expected = "range end index 4 out of range for slice of length 3")]
    fn panics_like_indexing() {
        let mut v = [1, 2, 3];
        sort(&mut v, 1, 0, 4);
    }

    #[test]
    fn try_sort_reports_errors() {
        let mut v = [2, 1];
        assert_eq!(
            try_sort(&mut v, 1, 2, 1),
            Err(SortError::InvalidRange { low: 2, high: 1 })
        );
        assert_eq!(try_sort(&mut v, 0, 0, 2), Err(SortError::InvalidParallelism));
        assert_eq!(v, [2, 1]);

        assert_eq!(try_sort(&mut v, 1, 0, 2), Ok(()));
        assert_eq!(v, [1, 2]);
    }
}
