use ndarray_npy::{ReadableElement, WritableElement};
use num_traits::{Num, NumCast};

/// Numeric element types a [`GenomicArray`](crate::GenomicArray) can store.
///
/// Implemented for every primitive that is arithmetic, castable and
/// npy-serializable, so `i32`, `u32`, `f32` and `f64` all qualify. The
/// element type is fixed at construction, replacing a runtime datatype
/// code with a compile-time parameter.
pub trait Element:
    Num + NumCast + Copy + PartialOrd + Send + Sync + WritableElement + ReadableElement + 'static
{
}

impl<T> Element for T where
    T: Num + NumCast + Copy + PartialOrd + Send + Sync + WritableElement + ReadableElement + 'static
{
}
