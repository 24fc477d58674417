//! Core types and traits for the dataset model

pub mod error;
pub mod traits;
pub mod types;

pub use self::error::*;
pub use self::traits::*;
pub use self::types::*;
