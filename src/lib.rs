//! Auto-sized feature vectors and labeled datasets
//!
//! A [`DataVector`] keeps an explicit stored prefix plus a logical length
//! whose tail is implicitly zero. It can be materialized into dense buffers
//! of several element widths. [`LabeledDataset`] holds labeled examples and
//! reads/writes them in a libsvm-style text format.

pub mod core;
pub mod data;
pub mod persistence;

// Re-export main types for convenience
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{DataError, Result};
pub use crate::data::{
    write_example, write_examples, ExampleIterator, IndexBase, LabeledDataset, ParseOptions,
};
pub use crate::persistence::DatasetSnapshot;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
