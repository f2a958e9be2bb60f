#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! palette-convolve: kernel convolution with palette quantization
//!
//! This library repeatedly convolves a small RGBA canvas with blur,
//! sharpen and directional emboss kernels and snaps every result back onto
//! a fixed palette. Run in a loop it produces slowly evolving pixel-art
//! textures.
//!
//! # Quick Start
//!
//! ```
//! use palette_convolve::{convolve, pattern, EmbossState, Palette, WeightedMatcher};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let palette = Palette::from_hex(&["#000000", "#ff004d", "#29adff", "#fff1e8"]).unwrap();
//! let matcher = WeightedMatcher::new(palette.clone());
//!
//! let mut canvas = pattern::randomize(24, 16, &palette, &mut rng).unwrap();
//! let mut emboss = EmbossState::random(&mut rng);
//! for _ in 0..3 {
//!     let kernel = emboss.next_kernel(5, &mut rng).unwrap();
//!     canvas = convolve(&canvas, &kernel, Some(&matcher));
//! }
//!
//! assert!(canvas.pixels().all(|p| palette.contains([p[0], p[1], p[2]].into())));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Kernel generator  (random, emboss + EmbossState, fixed blur / sharpen)
//!     |
//!     v
//! convolve()        (f64 sums, clamped edges, alpha copied)
//!     |
//!     v
//! ColorMapper       (WeightedMatcher, LinearScan, or saturating store)
//!     |
//!     v
//! PixelBuffer       (becomes the next frame's input)
//! ```
//!
//! # Weighted Matching
//!
//! [`WeightedMatcher`] divides each squared distance by
//! `sqrt(max_min / min_dist[i])`, where `min_dist[i]` is the distance from
//! palette entry `i` to its nearest neighbour. Colors in tight clusters
//! get a wider catchment area, so a palette with several near shades does
//! not collapse onto its isolated colors after a few dozen convolutions.
//!
//! # Randomness
//!
//! Every random draw goes through a caller-supplied [`rand::Rng`]. Seeding
//! a [`rand::rngs::StdRng`] makes a whole run reproducible.

pub mod buffer;
pub mod color;
pub mod convolve;
pub mod error;
pub mod kernel;
pub mod palette;
pub mod pattern;

#[cfg(test)]
mod domain_tests;

pub use buffer::{BufferError, PixelBuffer, CHANNELS};
pub use color::Rgb;
pub use convolve::convolve;
pub use error::ConvolveError;
pub use kernel::{EmbossState, Kernel, KernelError, EMBOSS_DRIFT, MAX_KERNEL_SIZE};
pub use palette::{ColorMapper, LinearScan, Palette, PaletteError, ParseColorError, WeightedMatcher};
