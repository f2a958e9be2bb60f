//! Kernelsketch
//!
//! Generative pixel art from repeated palette-quantized convolution.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
