//! Square convolution kernels.

use rand::Rng;
use thiserror::Error;

/// Error type for kernel construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// No weights (or a side length of zero)
    #[error("kernel cannot be empty")]
    Empty,
    /// Weight count is not a perfect square
    #[error("kernel length {len} is not a perfect square")]
    NotSquare {
        /// Number of weights supplied
        len: usize,
    },
    /// Side length is even, so the kernel has no center cell
    #[error("kernel size {size} is even (must be odd)")]
    EvenSize {
        /// Offending side length
        size: usize,
    },
    /// A weight is NaN or infinite
    #[error("kernel weight at index {index} is not finite")]
    NonFinite {
        /// Index of the first non-finite weight
        index: usize,
    },
    /// Random kernel scale is NaN or infinite
    #[error("kernel scale {0} is not finite")]
    InvalidScale(f64),
    /// Side length exceeds [`MAX_KERNEL_SIZE`]
    #[error("kernel size {size} exceeds the maximum of {max}")]
    TooLarge {
        /// Offending side length
        size: usize,
        /// Largest accepted side length
        max: usize,
    },
}

/// Largest accepted kernel side length.
pub const MAX_KERNEL_SIZE: usize = 255;

/// A square grid of weights with odd side length `N`, stored row-major.
///
/// Convolution centers the kernel on each target pixel, so cell
/// `(kx, ky)` samples the pixel at offset `(kx - N/2, ky - N/2)`.
///
/// Kernels are not required to sum to 1. The generators in this crate
/// divide by the weight sum to preserve overall brightness, except when
/// that sum is exactly zero, in which case the raw weights are kept.
///
/// # Example
///
/// ```
/// use palette_convolve::Kernel;
///
/// let k = Kernel::from_weights(vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(k.size(), 3);
/// assert_eq!(k, Kernel::identity(3).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from raw row-major weights.
    ///
    /// # Errors
    ///
    /// - [`KernelError::Empty`] for no weights
    /// - [`KernelError::NotSquare`] if the length is not `N²`
    /// - [`KernelError::EvenSize`] if `N` is even
    /// - [`KernelError::TooLarge`] if `N` exceeds [`MAX_KERNEL_SIZE`]
    /// - [`KernelError::NonFinite`] if any weight is NaN or infinite
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, KernelError> {
        let len = weights.len();
        let size = integer_sqrt(len);
        if size * size != len {
            return Err(KernelError::NotSquare { len });
        }
        check_size(size)?;
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(KernelError::NonFinite { index });
        }
        Ok(Self { size, weights })
    }

    /// 1 at the center, 0 elsewhere.
    pub fn identity(size: usize) -> Result<Self, KernelError> {
        check_size(size)?;
        let mut weights = vec![0.0; size * size];
        weights[size * size / 2] = 1.0;
        Ok(Self { size, weights })
    }

    /// Uniform box blur: every weight is `1 / N²`.
    pub fn box_blur(size: usize) -> Result<Self, KernelError> {
        check_size(size)?;
        let n = size * size;
        Ok(Self {
            size,
            weights: vec![1.0 / n as f64; n],
        })
    }

    /// 3×3 sharpen kernel.
    ///
    /// ```text
    ///     0  -1   0
    ///    -1   5  -1
    ///     0  -1   0
    /// ```
    pub fn sharpen() -> Self {
        Self {
            size: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    /// Random kernel with weights drawn uniformly from `[-scale/2, scale/2)`,
    /// normalized by their sum.
    ///
    /// If the draw happens to sum to exactly zero the raw weights are
    /// returned unnormalized.
    pub fn random<R: Rng + ?Sized>(size: usize, scale: f64, rng: &mut R) -> Result<Self, KernelError> {
        check_size(size)?;
        if !scale.is_finite() {
            return Err(KernelError::InvalidScale(scale));
        }
        let weights = (0..size * size)
            .map(|_| (rng.gen::<f64>() - 0.5) * scale)
            .collect();
        Ok(Self {
            size,
            weights: normalize(weights),
        })
    }

    /// Side length `N`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset from the kernel's top-left cell to its center, `N / 2`.
    #[inline]
    pub fn half(&self) -> usize {
        self.size / 2
    }

    /// All weights, row-major.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn get(&self, kx: usize, ky: usize) -> f64 {
        self.weights[ky * self.size + kx]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub(crate) fn from_parts(size: usize, weights: Vec<f64>) -> Self {
        debug_assert_eq!(weights.len(), size * size);
        Self { size, weights }
    }
}

/// Divide every weight by the total, unless the total is exactly zero.
pub(crate) fn normalize(weights: Vec<f64>) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum != 0.0 {
        weights.into_iter().map(|w| w / sum).collect()
    } else {
        weights
    }
}

pub(crate) fn check_size(size: usize) -> Result<(), KernelError> {
    if size == 0 {
        Err(KernelError::Empty)
    } else if size % 2 == 0 {
        Err(KernelError::EvenSize { size })
    } else if size > MAX_KERNEL_SIZE || size.checked_mul(size).is_none() {
        Err(KernelError::TooLarge {
            size,
            max: MAX_KERNEL_SIZE,
        })
    } else {
        Ok(())
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut s = (n as f64).sqrt() as usize;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}
