//! Convolution kernels and kernel generators.
//!
//! - [`Kernel`]: validated square grid of weights, plus the fixed blur,
//!   sharpen and identity kernels and the uniform random generator.
//! - [`EmbossState`]: directional emboss generator whose angle drifts
//!   forward on every call.

mod emboss;
mod kernel;

pub use emboss::{EmbossState, EMBOSS_DRIFT};
pub use kernel::{Kernel, KernelError, MAX_KERNEL_SIZE};
