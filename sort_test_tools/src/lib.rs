use std::cmp::Ordering;
use std::fmt::Debug;

use dual_pivot_sort::DualPivotSort;

/// The implementation under test.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: DualPivotSort;
}

/// Element types the suite is instantiated for, with the reference order to check against.
pub trait Primitive: DualPivotSort + Debug + PartialEq {
    /// Maps a pattern value into this type. Narrow types wrap, floats keep the value.
    fn from_i32(val: i32) -> Self;

    /// The reference order, IEEE total order for floats.
    fn reference_cmp(&self, other: &Self) -> Ordering;

    /// Bitwise identity, tells `-0.0` from `0.0`.
    fn identical(&self, other: &Self) -> bool;
}

macro_rules! primitive_int_impl {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                #[inline]
                fn from_i32(val: i32) -> Self {
                    val as $t
                }

                #[inline]
                fn reference_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                #[inline]
                fn identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

macro_rules! primitive_float_impl {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                #[inline]
                fn from_i32(val: i32) -> Self {
                    val as $t
                }

                #[inline]
                fn reference_cmp(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }

                #[inline]
                fn identical(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

primitive_int_impl!(i8, i16, i32, i64, u16);
primitive_float_impl!(f32, f64);

#[doc(hidden)]
pub use paste;

pub mod patterns;
