//! Palette types and nearest-color matching
//!
//! This module provides the [`Palette`] container, the [`ColorMapper`]
//! capability consumed by convolution, and its two implementations.

mod error;
mod matcher;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use matcher::{ColorMapper, LinearScan, WeightedMatcher};
pub use palette::Palette;
