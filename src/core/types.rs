//! Core type definitions: data vectors and labeled examples

use std::sync::Arc;

use crate::core::traits::Element;
use crate::core::{DataError, Result};

/// Largest dimensionality a vector may be built with from sparse input
///
/// Sparse records are stored densely up to their last index, so an index at
/// or past this bound is rejected rather than allocated.
pub const MAX_FEATURES: usize = 1 << 26;

/// Auto-sized feature vector
///
/// Holds an explicit "stored" prefix of values plus a logical length that may
/// be longer. Every position in `[stored_len, logical_len)` is an implicit
/// zero that is never kept in memory. Storage is shared and immutable, so
/// cloning only bumps a reference count.
#[derive(Clone, Debug)]
pub struct DataVector {
    values: Arc<[f64]>,
    logical_len: usize,
}

impl DataVector {
    /// Create an empty vector (stored and logical length 0)
    pub fn new() -> Self {
        Self {
            values: Arc::from(Vec::new()),
            logical_len: 0,
        }
    }

    /// Create a vector from dense values; stored length equals logical length
    pub fn from_dense(values: Vec<f64>) -> Self {
        let logical_len = values.len();
        Self {
            values: Arc::from(values),
            logical_len,
        }
    }

    /// Create a vector with an implicit zero tail up to `logical_len`
    ///
    /// A `logical_len` shorter than `values` is raised to `values.len()`.
    pub fn with_logical_len(values: Vec<f64>, logical_len: usize) -> Self {
        let logical_len = logical_len.max(values.len());
        Self {
            values: Arc::from(values),
            logical_len,
        }
    }

    /// Create a vector from `(index, value)` pairs
    ///
    /// The stored length is one past the largest index. Gaps below it are
    /// explicit zeros; a repeated index keeps the last value. Fails with
    /// [`DataError::DimensionTooLarge`] for any index `>= MAX_FEATURES`.
    pub fn from_sparse<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut values = Vec::new();
        for (index, value) in pairs {
            let needed = index
                .checked_add(1)
                .filter(|&len| len <= MAX_FEATURES)
                .ok_or(DataError::DimensionTooLarge {
                    index,
                    max: MAX_FEATURES,
                })?;
            if needed > values.len() {
                values.resize(needed, 0.0);
            }
            values[index] = value;
        }
        Ok(Self::from_dense(values))
    }

    /// Number of explicitly held values
    pub fn stored_len(&self) -> usize {
        self.values.len()
    }

    /// Full dimensionality, including the implicit zero tail
    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    /// True when no values are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, 0 anywhere past the stored portion
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Borrow the stored portion
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Dense copy of the stored portion only
    ///
    /// The result has `stored_len()` elements, which is shorter than
    /// `logical_len()` whenever the vector has an implicit zero tail.
    pub fn to_array(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Number of non-zero stored values
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }

    /// Iterate `(index, value)` over the non-zero stored values
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
    }

    /// True when both handles point at the same storage
    pub fn shares_storage(&self, other: &DataVector) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    /// Copy the stored values into a caller-owned buffer
    ///
    /// A buffer shorter than `stored_len()` is grown to exactly that length;
    /// a longer one keeps its length. The whole buffer is zeroed before the
    /// copy, so positions past the stored values are always 0 regardless of
    /// what the buffer held before. Values are narrowed with
    /// [`Element::from_f64`].
    pub fn materialize_into<T: Element>(&self, buffer: &mut Vec<T>) {
        if buffer.len() < self.values.len() {
            buffer.resize(self.values.len(), T::ZERO);
        }
        self.materialize_into_slice(buffer);
    }

    /// Copy the stored values into a fixed-size slice
    ///
    /// The slice is zeroed first; stored values that do not fit are dropped.
    pub fn materialize_into_slice<T: Element>(&self, dst: &mut [T]) {
        dst.fill(T::ZERO);
        for (slot, &value) in dst.iter_mut().zip(self.values.iter()) {
            *slot = T::from_f64(value);
        }
    }

    /// Dense buffer of exactly `len` elements, truncated or zero-padded
    pub fn to_dense<T: Element>(&self, len: usize) -> Vec<T> {
        let mut out = vec![T::ZERO; len];
        self.materialize_into_slice(&mut out);
        out
    }
}

impl Default for DataVector {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DataVector {
    fn eq(&self, other: &Self) -> bool {
        self.logical_len == other.logical_len && self.values == other.values
    }
}

impl From<Vec<f64>> for DataVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_dense(values)
    }
}

impl From<&[f64]> for DataVector {
    fn from(values: &[f64]) -> Self {
        Self::from_dense(values.to_vec())
    }
}

/// Weight and label carried by every example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightLabel {
    pub weight: f64,
    pub label: f64,
}

impl WeightLabel {
    pub fn new(weight: f64, label: f64) -> Self {
        Self { weight, label }
    }
}

impl Default for WeightLabel {
    fn default() -> Self {
        Self {
            weight: 1.0,
            label: 0.0,
        }
    }
}

/// Feature vector paired with its weight/label metadata
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledExample {
    data: DataVector,
    metadata: WeightLabel,
}

impl LabeledExample {
    /// Create an example with weight 1.0
    ///
    /// The label is not validated; NaN and infinities are kept as given.
    pub fn new(data: DataVector, label: f64) -> Self {
        Self::with_metadata(data, WeightLabel::new(1.0, label))
    }

    /// Create an example with explicit metadata
    pub fn with_metadata(data: DataVector, metadata: WeightLabel) -> Self {
        Self { data, metadata }
    }

    pub fn label(&self) -> f64 {
        self.metadata.label
    }

    pub fn weight(&self) -> f64 {
        self.metadata.weight
    }

    pub fn metadata(&self) -> WeightLabel {
        self.metadata
    }

    /// Handle to the feature vector; shares storage with this example
    pub fn data(&self) -> DataVector {
        self.data.clone()
    }

    /// Borrow the feature vector
    pub fn data_ref(&self) -> &DataVector {
        &self.data
    }
}
