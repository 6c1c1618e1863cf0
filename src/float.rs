//! Floating point sort: NaN and negative zero are taken out of the way before the wide engine
//! runs and restored afterwards.

use log::debug;

use crate::error::SortError;
use crate::tunables::Tunables;
use crate::{parallel, Element};

pub(crate) trait FloatElement: Element {
    const ZERO: Self;
    const NEGATIVE_ZERO: Self;

    fn is_nan(self) -> bool;

    fn is_negative_zero(self) -> bool;
}

macro_rules! float_element_impl {
    ($($t:ty),*) => {
        $(
            impl FloatElement for $t {
                const ZERO: Self = 0.0;
                const NEGATIVE_ZERO: Self = -0.0;

                #[inline]
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }

                #[inline]
                fn is_negative_zero(self) -> bool {
                    self == 0.0 && self.is_sign_negative()
                }
            }
        )*
    };
}

float_element_impl!(f32, f64);

/// Sorts `v` in the order `-inf < .. < -0.0 < 0.0 < .. < inf < NaN`, the order of NaN values
/// among each other is unspecified.
pub(crate) fn sort<T: FloatElement>(
    v: &mut [T],
    parallelism: usize,
    t: &Tunables,
) -> Result<(), SortError> {
    let mut high = v.len();
    let mut negative_zeros = 0;

    // Phase 1. Count negative zeros and turn them into positive ones, move NaNs to the end.
    for k in (0..v.len()).rev() {
        let ak = v[k];

        if ak.is_negative_zero() {
            negative_zeros += 1;
            v[k] = T::ZERO;
        } else if ak.is_nan() {
            high -= 1;
            v[k] = v[high];
            v[high] = ak;
        }
    }

    if high < v.len() || negative_zeros > 0 {
        debug!(
            "Set aside {} NaN values and {negative_zeros} negative zeros.",
            v.len() - high
        );
    }

    // Phase 2. Sort everything except NaN, which is already in place.
    let (numbers, _) = v.split_at_mut(high);
    parallel::sort(numbers, parallelism, t)?;

    // Phase 3. Turn positive zeros back into negative zeros.
    if negative_zeros > 0 {
        // The first zero, the counted ones are all there.
        let zeros = numbers.partition_point(|x| *x < T::ZERO);
        numbers[zeros..zeros + negative_zeros].fill(T::NEGATIVE_ZERO);
    }

    Ok(())
}
