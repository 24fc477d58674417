//! Core traits for dataset access and buffer materialization

use crate::core::{LabeledExample, Result};

/// Numeric element a [`DataVector`](crate::core::DataVector) can be materialized into
///
/// Narrowing follows Rust `as` casts:
/// - `f64` is exact
/// - `f32` rounds to nearest, values past `f32::MAX` become infinities
/// - integers truncate toward zero, saturate at the type bounds, and map NaN to 0
pub trait Element: Copy + PartialEq + std::fmt::Debug {
    const ZERO: Self;

    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                const ZERO: Self = $zero;

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_element! {
    f64 => 0.0,
    f32 => 0.0,
    i64 => 0,
    i32 => 0,
    i16 => 0,
    i8 => 0,
    u8 => 0,
}

/// Read access to a collection of labeled examples
pub trait Dataset: Send + Sync {
    /// Number of examples
    fn num_examples(&self) -> usize;

    /// Feature dimensionality, at least every example's logical length
    fn num_features(&self) -> usize;

    /// Detached copy of the example at `index`
    ///
    /// Fails with [`DataError::IndexOutOfBounds`](crate::core::DataError::IndexOutOfBounds)
    /// when `index >= num_examples()`.
    fn get_example(&self, index: usize) -> Result<LabeledExample>;

    /// Get several examples at once
    fn get_batch(&self, indices: &[usize]) -> Result<Vec<LabeledExample>> {
        indices.iter().map(|&i| self.get_example(i)).collect()
    }

    /// All labels in insertion order
    fn labels(&self) -> Vec<f64>;

    fn is_empty(&self) -> bool {
        self.num_examples() == 0
    }
}
