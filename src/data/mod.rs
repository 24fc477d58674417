//! Dataset container and text format
//!
//! This module provides the in-memory labeled dataset and the line-oriented
//! record format used to load and save it.

pub mod dataset;
pub mod text;

pub use self::dataset::*;
pub use self::text::*;
