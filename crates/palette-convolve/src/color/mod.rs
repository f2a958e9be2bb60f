//! Color types
//!
//! The pipeline works on 8-bit RGB triples. Convolution accumulates in
//! `f64` and only returns to [`Rgb`] through a saturating store or a
//! palette lookup.

mod rgb;

pub(crate) use rgb::saturate;
pub use rgb::Rgb;
